//! Drives a `SessionController` and carries out its effects.

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::oneshot;

use super::collaborators::{StatsRecorder, WordStore};
use super::controller::{Effect, Phase, SessionController, Transition};
use super::error::SessionError;

/// Resolves once with the raw correct count when a challenge completes.
///
/// Resolves to `None` if the session is cancelled or dropped first.
#[derive(Debug)]
pub struct ChallengeHandle(oneshot::Receiver<u32>);

impl ChallengeHandle {
  pub async fn score(self) -> Option<u32> {
    self.0.await.ok()
  }
}

pub struct SessionRunner<W, S> {
  controller: SessionController,
  words: W,
  stats: S,
  challenge: Option<oneshot::Sender<u32>>,
}

impl<W: WordStore, S: StatsRecorder> SessionRunner<W, S> {
  pub fn new(controller: SessionController, words: W, stats: S) -> Self {
    Self {
      controller,
      words,
      stats,
      challenge: None,
    }
  }

  /// Like `new`, but also hands back a future for the final score
  pub fn with_challenge(controller: SessionController, words: W, stats: S) -> (Self, ChallengeHandle) {
    let (tx, rx) = oneshot::channel();
    let runner = Self {
      controller,
      words,
      stats,
      challenge: Some(tx),
    };
    (runner, ChallengeHandle(rx))
  }

  pub fn controller(&self) -> &SessionController {
    &self.controller
  }

  pub fn start_test<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Phase, SessionError> {
    let t = self.controller.start_test(rng)?;
    Ok(self.apply(t))
  }

  pub fn submit(&mut self, input: &str, now: DateTime<Utc>) -> Result<Phase, SessionError> {
    let t = self.controller.submit(input, now)?;
    Ok(self.apply(t))
  }

  pub fn reveal(&mut self, now: DateTime<Utc>) -> Result<Phase, SessionError> {
    let t = self.controller.reveal(now)?;
    Ok(self.apply(t))
  }

  pub fn skip(&mut self, now: DateTime<Utc>) -> Result<Phase, SessionError> {
    let t = self.controller.skip(now)?;
    Ok(self.apply(t))
  }

  pub fn advance(&mut self) -> Result<Phase, SessionError> {
    let t = self.controller.advance()?;
    Ok(self.apply(t))
  }

  pub fn cancel(&mut self) -> Result<Phase, SessionError> {
    let t = self.controller.cancel()?;
    // Dropping the sender resolves a pending challenge to None
    self.challenge = None;
    Ok(self.apply(t))
  }

  /// Storage failures are logged and swallowed so the session can always finish
  fn apply(&mut self, transition: Transition) -> Phase {
    for effect in transition.effects {
      match effect {
        Effect::SaveCard(card) => {
          if let Err(e) = self.words.save_word_card(&card) {
            tracing::warn!("Failed to save word {}: {}", card.id, e);
          }
        }
        Effect::RecordStudySession { words_studied } => {
          if let Err(e) = self.stats.record_study_session(words_studied) {
            tracing::warn!("Failed to record study session: {}", e);
          }
        }
        Effect::ReportChallengeScore { correct_count } => {
          if let Some(tx) = self.challenge.take() {
            if tx.send(correct_count).is_err() {
              tracing::debug!("Challenge score {} dropped, nobody was waiting", correct_count);
            }
          }
        }
      }
    }
    transition.phase
  }
}
