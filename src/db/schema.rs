use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  // Migrations below handle upgrades for existing databases
  conn.execute_batch(
    r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS topics (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL UNIQUE,
      description TEXT,
      created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS words (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      topic_id INTEGER,
      front TEXT NOT NULL,
      back TEXT NOT NULL,
      ease_factor REAL NOT NULL DEFAULT 2.5,
      interval_days INTEGER NOT NULL DEFAULT 0,
      repetitions INTEGER NOT NULL DEFAULT 0,
      next_review_at TEXT NOT NULL,
      last_reviewed_at TEXT,
      correct_count INTEGER NOT NULL DEFAULT 0,
      wrong_count INTEGER NOT NULL DEFAULT 0,
      FOREIGN KEY (topic_id) REFERENCES topics(id)
    );

    -- One row per calendar day (UTC) with any finished session
    CREATE TABLE IF NOT EXISTS study_activity (
      day TEXT PRIMARY KEY,
      sessions INTEGER NOT NULL DEFAULT 0,
      words_studied INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS challenge_scores (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      challenge_id TEXT NOT NULL,
      correct_count INTEGER NOT NULL,
      total INTEGER NOT NULL,
      recorded_at TEXT NOT NULL
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_words_next_review ON words(next_review_at);
    CREATE INDEX IF NOT EXISTS idx_words_topic ON words(topic_id);
    CREATE INDEX IF NOT EXISTS idx_challenge_scores_challenge ON challenge_scores(challenge_id);
    "#,
  )?;

  // ============================================================
  // MIGRATIONS FOR EXISTING DATABASES
  // These are no-ops for new databases (columns already exist)
  // ============================================================

  // Migration: topics gained a description after the first release
  add_column_if_missing(conn, "topics", "description", "TEXT")?;

  // Migration: last review time was added alongside the lifetime counters
  let had_last_reviewed = column_exists(conn, "words", "last_reviewed_at");
  add_column_if_missing(conn, "words", "last_reviewed_at", "TEXT")?;

  // Words answered before the column existed have no timestamp; leave them
  // NULL unless they were clearly reviewed at least once
  if !had_last_reviewed {
    conn.execute(
      "UPDATE words SET last_reviewed_at = next_review_at WHERE last_reviewed_at IS NULL AND correct_count + wrong_count > 0",
      [],
    )?;
  }

  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_migrations_are_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    run_migrations(&conn).unwrap();
    assert!(column_exists(&conn, "words", "last_reviewed_at"));
    assert!(column_exists(&conn, "topics", "description"));
  }

  #[test]
  fn test_upgrade_adds_missing_columns() {
    let conn = Connection::open_in_memory().unwrap();
    conn
      .execute_batch(
        r#"
        CREATE TABLE topics (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE, created_at TEXT NOT NULL);
        CREATE TABLE words (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          topic_id INTEGER,
          front TEXT NOT NULL,
          back TEXT NOT NULL,
          ease_factor REAL NOT NULL DEFAULT 2.5,
          interval_days INTEGER NOT NULL DEFAULT 0,
          repetitions INTEGER NOT NULL DEFAULT 0,
          next_review_at TEXT NOT NULL,
          correct_count INTEGER NOT NULL DEFAULT 0,
          wrong_count INTEGER NOT NULL DEFAULT 0
        );
        INSERT INTO words (front, back, next_review_at, correct_count) VALUES ('a', 'b', '2025-01-02T00:00:00Z', 1);
        INSERT INTO words (front, back, next_review_at) VALUES ('c', 'd', '2025-01-02T00:00:00Z');
        "#,
      )
      .unwrap();

    run_migrations(&conn).unwrap();

    let reviewed: Vec<Option<String>> = conn
      .prepare("SELECT last_reviewed_at FROM words ORDER BY id")
      .unwrap()
      .query_map([], |row| row.get(0))
      .unwrap()
      .collect::<Result<Vec<_>>>()
      .unwrap();
    assert_eq!(reviewed, vec![Some("2025-01-02T00:00:00Z".to_string()), None]);
    assert!(column_exists(&conn, "topics", "description"));
  }
}
