//! Application state shared by all handlers.

use crate::db::{DbPool, SqliteStore};
use crate::session::{SessionRunner, SessionStore};

/// A running session wired to the SQLite collaborators
pub type LiveSession = SessionRunner<SqliteStore, SqliteStore>;

#[derive(Clone)]
pub struct AppState {
  pub pool: DbPool,
  pub sessions: SessionStore<LiveSession>,
}

impl AppState {
  pub fn new(pool: DbPool) -> Self {
    Self {
      pool,
      sessions: SessionStore::new(),
    }
  }

  pub fn store(&self) -> SqliteStore {
    SqliteStore::new(self.pool.clone())
  }
}
