//! Topic CRUD

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::Topic;

use super::words::{format_timestamp, parse_timestamp};

pub fn insert_topic(
  conn: &Connection,
  name: &str,
  description: Option<&str>,
  now: DateTime<Utc>,
) -> Result<i64> {
  conn.execute(
    "INSERT INTO topics (name, description, created_at) VALUES (?1, ?2, ?3)",
    params![name, description, format_timestamp(now)],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_topic(conn: &Connection, id: i64) -> Result<Option<Topic>> {
  conn
    .query_row(
      r#"
      SELECT t.id, t.name, t.description, t.created_at,
             (SELECT COUNT(*) FROM words w WHERE w.topic_id = t.id)
      FROM topics t WHERE t.id = ?1
      "#,
      params![id],
      row_to_topic,
    )
    .optional()
}

pub fn list_topics(conn: &Connection) -> Result<Vec<Topic>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT t.id, t.name, t.description, t.created_at,
           (SELECT COUNT(*) FROM words w WHERE w.topic_id = t.id)
    FROM topics t
    ORDER BY t.name COLLATE NOCASE ASC
    "#,
  )?;
  let topics = stmt.query_map([], row_to_topic)?.collect::<Result<Vec<_>>>()?;
  Ok(topics)
}

/// Delete a topic together with its words
pub fn delete_topic(conn: &Connection, id: i64) -> Result<bool> {
  let tx = conn.unchecked_transaction()?;
  let words = tx.execute("DELETE FROM words WHERE topic_id = ?1", params![id])?;
  let deleted = tx.execute("DELETE FROM topics WHERE id = ?1", params![id])?;
  tx.commit()?;

  if deleted > 0 {
    tracing::debug!("Deleted topic {} and {} words", id, words);
  }
  Ok(deleted > 0)
}

fn row_to_topic(row: &rusqlite::Row) -> Result<Topic> {
  let created_at_str: String = row.get(3)?;
  Ok(Topic {
    id: row.get(0)?,
    name: row.get(1)?,
    description: row.get(2)?,
    created_at: parse_timestamp(&created_at_str).unwrap_or_else(Utc::now),
    word_count: row.get(4)?,
  })
}
