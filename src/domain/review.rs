use serde::{Deserialize, Serialize};

/// How a single round in a session was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
  /// Typed answer matched the expected one
  Correct,
  /// Typed answer did not match
  Wrong,
  /// User asked to see the answer without guessing
  Revealed,
  /// User moved on without answering
  Skipped,
}

impl AnswerOutcome {
  pub fn is_correct(&self) -> bool {
    matches!(self, Self::Correct)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Correct => "correct",
      Self::Wrong => "wrong",
      Self::Revealed => "revealed",
      Self::Skipped => "skipped",
    }
  }
}

/// Which flow a session runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
  Review,    // Study list first, then a shuffled test
  Test,      // Straight into a shuffled test
  Challenge, // Test whose score is handed off when it completes
  Listening, // Test with the prompt played as audio
}

impl SessionKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Review => "review",
      Self::Test => "test",
      Self::Challenge => "challenge",
      Self::Listening => "listening",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "review" => Some(Self::Review),
      "test" => Some(Self::Test),
      "challenge" => Some(Self::Challenge),
      "listening" => Some(Self::Listening),
      _ => None,
    }
  }

  /// Review sessions open on the study list; everything else starts testing
  pub fn has_study_phase(&self) -> bool {
    matches!(self, Self::Review)
  }
}

/// How the prompt side of a card should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptMode {
  Text,
  Audio,
}
