use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Starting ease for every new word.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

fn default_ease_factor() -> f64 {
  DEFAULT_EASE_FACTOR
}

/// Where a word sits in its review lifecycle, as of a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
  Due,
  New,
  Mastered,
  Learning,
}

impl CardStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Due => "due",
      Self::New => "new",
      Self::Mastered => "mastered",
      Self::Learning => "learning",
    }
  }
}

/// A vocabulary entry plus its spaced-repetition scheduling state.
///
/// Missing scheduling fields fall back to the values a freshly created card
/// carries, so partially filled records coming from older exports or clients
/// are still usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCard {
  #[serde(default)]
  pub id: i64,
  #[serde(default)]
  pub topic_id: Option<i64>,
  pub front: String,
  pub back: String,

  #[serde(default = "default_ease_factor")]
  pub ease_factor: f64,
  #[serde(default)]
  pub interval_days: u32,
  #[serde(default)]
  pub repetitions: u32,
  #[serde(default = "Utc::now")]
  pub next_review_at: DateTime<Utc>,
  #[serde(default)]
  pub last_reviewed_at: Option<DateTime<Utc>>,

  // Lifetime counters, never reset
  #[serde(default)]
  pub correct_count: u32,
  #[serde(default)]
  pub wrong_count: u32,
}

impl WordCard {
  pub fn new(front: String, back: String, now: DateTime<Utc>) -> Self {
    Self {
      id: 0,
      topic_id: None,
      front,
      back,
      ease_factor: DEFAULT_EASE_FACTOR,
      interval_days: 0,
      repetitions: 0,
      next_review_at: now,
      last_reviewed_at: None,
      correct_count: 0,
      wrong_count: 0,
    }
  }

  pub fn with_topic(mut self, topic_id: Option<i64>) -> Self {
    self.topic_id = topic_id;
    self
  }

  /// Total number of answers ever recorded for this card
  pub fn total_answers(&self) -> u32 {
    self.correct_count + self.wrong_count
  }
}
