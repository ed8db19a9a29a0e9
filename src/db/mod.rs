pub mod challenges;
pub mod schema;
pub mod stats;
pub mod topics;
pub mod words;

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::domain::WordCard;
use crate::session::{StatsRecorder, WordStore};

// Re-export all public items from submodules
pub use challenges::*;
pub use schema::run_migrations;
pub use stats::*;
pub use topics::*;
pub use words::*;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
  /// Log the error at warn level and return None
  fn log_warn(self, context: &str) -> Option<T>;
  /// Log the error at warn level and return the default
  fn log_warn_default(self, context: &str) -> T
  where
    T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
  fn log_warn(self, context: &str) -> Option<T> {
    match self {
      Ok(v) => Some(v),
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        None
      }
    }
  }

  fn log_warn_default(self, context: &str) -> T
  where
    T: Default,
  {
    match self {
      Ok(v) => v,
      Err(e) => {
        tracing::warn!("{}: {}", context, e);
        T::default()
      }
    }
  }
}

#[derive(Debug, Error)]
pub enum StoreError {
  /// A thread panicked while holding the connection
  #[error("Database unavailable")]
  Lock,

  #[error("Database error: {0}")]
  Sqlite(#[from] rusqlite::Error),
}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, StoreError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    StoreError::Lock
  })
}

pub fn init_db(path: &Path) -> rusqlite::Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).ok();
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    if let Err(e) = std::fs::copy(path, &backup_path) {
      tracing::warn!("Could not create database backup: {}", e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  Ok(Arc::new(Mutex::new(conn)))
}

/// SQLite-backed word storage and stats bookkeeping for sessions
#[derive(Clone)]
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }
}

impl WordStore for SqliteStore {
  type Error = StoreError;

  fn load_word_card(&self, id: i64) -> Result<Option<WordCard>, StoreError> {
    let conn = try_lock(&self.pool)?;
    Ok(get_word_by_id(&conn, id)?)
  }

  fn save_word_card(&self, card: &WordCard) -> Result<(), StoreError> {
    let conn = try_lock(&self.pool)?;
    if !update_word_schedule(&conn, card)? {
      // Deleted mid-session; nothing to write back to
      tracing::debug!("Word {} no longer exists, schedule not saved", card.id);
    }
    Ok(())
  }

  fn list_due_cards(&self, as_of: NaiveDate) -> Result<Vec<WordCard>, StoreError> {
    let conn = try_lock(&self.pool)?;
    Ok(list_due_words(&conn, as_of, None)?)
  }
}

impl StatsRecorder for SqliteStore {
  type Error = StoreError;

  fn record_study_session(&self, words_studied: u32) -> Result<(), StoreError> {
    let conn = try_lock(&self.pool)?;
    stats::record_study_session(&conn, words_studied, Utc::now().date_naive())?;
    Ok(())
  }
}
