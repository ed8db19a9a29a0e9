//! Boundaries a session needs from the rest of the application.

use chrono::NaiveDate;
use std::fmt::Display;

use crate::domain::WordCard;

/// Persistence for word cards
pub trait WordStore {
  type Error: Display;

  fn load_word_card(&self, id: i64) -> Result<Option<WordCard>, Self::Error>;

  /// Write-through of a card's scheduling fields and counters
  fn save_word_card(&self, card: &WordCard) -> Result<(), Self::Error>;

  /// Cards whose due date (date only) is on or before `as_of`
  fn list_due_cards(&self, as_of: NaiveDate) -> Result<Vec<WordCard>, Self::Error>;
}

/// Streak / activity bookkeeping, fed once per completed session
pub trait StatsRecorder {
  type Error: Display;

  fn record_study_session(&self, words_studied: u32) -> Result<(), Self::Error>;
}
