//! Test utilities for database setup.
//!
//! Reuses the production migrations so tests never carry their own copy of
//! the schema.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::db::{self, DbPool};

/// Migrated database file inside a temporary directory.
///
/// The directory (and the database) is removed when this is dropped.
pub struct TestEnv {
  /// Temporary directory (kept alive for database file persistence)
  pub temp: TempDir,
  /// Direct connection for SQL-level tests
  pub conn: Connection,
}

impl TestEnv {
  pub fn new() -> rusqlite::Result<Self> {
    let temp =
      TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    let conn = Connection::open(temp.path().join("vocab.db"))?;
    db::schema::run_migrations(&conn)?;

    Ok(Self { temp, conn })
  }

  /// Get the temporary directory path for creating test files.
  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  pub fn db_path(&self) -> PathBuf {
    self.temp.path().join("vocab.db")
  }

  /// A pool over the same database file, as the server would open it
  pub fn pool(&self) -> rusqlite::Result<DbPool> {
    db::init_db(&self.db_path())
  }
}
