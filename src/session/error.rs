use thiserror::Error;

/// Errors surfaced by the session state machine.
///
/// None of these leave a session half-updated: a rejected action is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
  /// Raised before any session exists
  #[error("No words to study. Add some words or pick another topic.")]
  EmptyQueue,

  #[error("Type an answer, or reveal or skip this word.")]
  InvalidAnswerInput,

  #[error("Cannot {action} while the session is {phase}")]
  InvalidAction {
    action: &'static str,
    phase: &'static str,
  },
}
