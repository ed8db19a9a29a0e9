//! Word CRUD and scheduling queries

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::collections::HashSet;

use crate::domain::WordCard;

const WORD_COLUMNS: &str = "id, topic_id, front, back, ease_factor, interval_days, repetitions, \
                            next_review_at, last_reviewed_at, correct_count, wrong_count";

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
  ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .ok()
}

pub fn insert_word(conn: &Connection, card: &WordCard) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO words (topic_id, front, back, ease_factor, interval_days, repetitions,
                       next_review_at, last_reviewed_at, correct_count, wrong_count)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
    "#,
    params![
      card.topic_id,
      card.front,
      card.back,
      card.ease_factor,
      card.interval_days,
      card.repetitions,
      format_timestamp(card.next_review_at),
      card.last_reviewed_at.map(format_timestamp),
      card.correct_count,
      card.wrong_count,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_word_by_id(conn: &Connection, id: i64) -> Result<Option<WordCard>> {
  conn
    .query_row(
      &format!("SELECT {} FROM words WHERE id = ?1", WORD_COLUMNS),
      params![id],
      row_to_word,
    )
    .optional()
}

/// Write a word's scheduling fields and counters. Front/back are untouched.
pub fn update_word_schedule(conn: &Connection, card: &WordCard) -> Result<bool> {
  let updated = conn.execute(
    r#"
    UPDATE words
    SET ease_factor = ?1, interval_days = ?2, repetitions = ?3, next_review_at = ?4,
        last_reviewed_at = ?5, correct_count = ?6, wrong_count = ?7
    WHERE id = ?8
    "#,
    params![
      card.ease_factor,
      card.interval_days,
      card.repetitions,
      format_timestamp(card.next_review_at),
      card.last_reviewed_at.map(format_timestamp),
      card.correct_count,
      card.wrong_count,
      card.id,
    ],
  )?;
  Ok(updated > 0)
}

pub fn delete_word(conn: &Connection, id: i64) -> Result<bool> {
  let deleted = conn.execute("DELETE FROM words WHERE id = ?1", params![id])?;
  Ok(deleted > 0)
}

/// All words, optionally restricted to one topic, oldest first
pub fn list_words(conn: &Connection, topic_id: Option<i64>) -> Result<Vec<WordCard>> {
  match topic_id {
    Some(topic_id) => {
      let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM words WHERE topic_id = ?1 ORDER BY id ASC",
        WORD_COLUMNS
      ))?;
      let words = stmt
        .query_map(params![topic_id], row_to_word)?
        .collect::<Result<Vec<_>>>()?;
      Ok(words)
    }
    None => {
      let mut stmt = conn.prepare(&format!("SELECT {} FROM words ORDER BY id ASC", WORD_COLUMNS))?;
      let words = stmt.query_map([], row_to_word)?.collect::<Result<Vec<_>>>()?;
      Ok(words)
    }
  }
}

/// Words in the order asked for. Missing ids are skipped and repeated ids
/// only appear once, at their first position.
pub fn get_words_by_ids(conn: &Connection, ids: &[i64]) -> Result<Vec<WordCard>> {
  let mut seen = HashSet::with_capacity(ids.len());
  let mut words = Vec::with_capacity(ids.len());
  for id in ids {
    if !seen.insert(*id) {
      continue;
    }
    if let Some(word) = get_word_by_id(conn, *id)? {
      words.push(word);
    }
  }
  Ok(words)
}

/// Words due on or before `as_of`, comparing calendar dates only
pub fn list_due_words(conn: &Connection, as_of: NaiveDate, topic_id: Option<i64>) -> Result<Vec<WordCard>> {
  let as_of = as_of.format("%Y-%m-%d").to_string();
  let mut stmt = conn.prepare(&format!(
    r#"
    SELECT {}
    FROM words
    WHERE date(next_review_at) <= ?1 AND (?2 IS NULL OR topic_id = ?2)
    ORDER BY next_review_at ASC, id ASC
    "#,
    WORD_COLUMNS
  ))?;
  let words = stmt
    .query_map(params![as_of, topic_id], row_to_word)?
    .collect::<Result<Vec<_>>>()?;
  Ok(words)
}

pub fn get_due_count(conn: &Connection, as_of: NaiveDate) -> Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM words WHERE date(next_review_at) <= ?1",
    params![as_of.format("%Y-%m-%d").to_string()],
    |row| row.get(0),
  )
}

pub(crate) fn row_to_word(row: &rusqlite::Row) -> Result<WordCard> {
  let next_review_str: String = row.get(7)?;
  let last_reviewed_str: Option<String> = row.get(8)?;

  Ok(WordCard {
    id: row.get(0)?,
    topic_id: row.get(1)?,
    front: row.get(2)?,
    back: row.get(3)?,
    ease_factor: row.get(4)?,
    interval_days: row.get(5)?,
    repetitions: row.get(6)?,
    // Unparseable dates make the word due rather than hiding it
    next_review_at: parse_timestamp(&next_review_str).unwrap_or_else(Utc::now),
    last_reviewed_at: last_reviewed_str.as_deref().and_then(parse_timestamp),
    correct_count: row.get(9)?,
    wrong_count: row.get(10)?,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::CardStatus;
  use crate::srs;
  use crate::testing::TestEnv;
  use chrono::{Duration, TimeZone};

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 20, 18, 30, 0).unwrap()
  }

  fn insert(conn: &Connection, front: &str, back: &str, due: DateTime<Utc>) -> i64 {
    let mut card = WordCard::new(front.to_string(), back.to_string(), now());
    card.next_review_at = due;
    insert_word(conn, &card).unwrap()
  }

  #[test]
  fn test_insert_and_get_word() {
    let env = TestEnv::new().unwrap();
    let id = insert(&env.conn, "la mesa", "table", now());

    let word = get_word_by_id(&env.conn, id).unwrap().unwrap();
    assert_eq!(word.id, id);
    assert_eq!(word.front, "la mesa");
    assert_eq!(word.back, "table");
    assert!((word.ease_factor - 2.5).abs() < f64::EPSILON);
    assert_eq!(word.next_review_at, now());
    assert!(word.last_reviewed_at.is_none());
  }

  #[test]
  fn test_get_missing_word() {
    let env = TestEnv::new().unwrap();
    assert!(get_word_by_id(&env.conn, 999).unwrap().is_none());
  }

  #[test]
  fn test_update_word_schedule() {
    let env = TestEnv::new().unwrap();
    let id = insert(&env.conn, "el libro", "book", now());

    let mut word = get_word_by_id(&env.conn, id).unwrap().unwrap();
    word.ease_factor = 2.6;
    word.interval_days = 1;
    word.repetitions = 1;
    word.next_review_at = now() + Duration::days(1);
    word.last_reviewed_at = Some(now());
    word.correct_count = 1;
    word.front = "ignored".to_string();
    assert!(update_word_schedule(&env.conn, &word).unwrap());

    let stored = get_word_by_id(&env.conn, id).unwrap().unwrap();
    assert_eq!(stored.front, "el libro");
    assert_eq!(stored.interval_days, 1);
    assert_eq!(stored.repetitions, 1);
    assert_eq!(stored.last_reviewed_at, Some(now()));
    assert_eq!(stored.correct_count, 1);
  }

  #[test]
  fn test_update_missing_word() {
    let env = TestEnv::new().unwrap();
    let mut word = WordCard::new("x".into(), "y".into(), now());
    word.id = 42;
    assert!(!update_word_schedule(&env.conn, &word).unwrap());
  }

  #[test]
  fn test_list_due_words_is_date_only() {
    let env = TestEnv::new().unwrap();
    let today_late = Utc.with_ymd_and_hms(2025, 4, 20, 23, 59, 0).unwrap();
    let tomorrow = Utc.with_ymd_and_hms(2025, 4, 21, 0, 5, 0).unwrap();
    let past = now() - Duration::days(3);

    let a = insert(&env.conn, "a", "1", today_late);
    insert(&env.conn, "b", "2", tomorrow);
    let c = insert(&env.conn, "c", "3", past);

    let due: Vec<i64> = list_due_words(&env.conn, now().date_naive(), None)
      .unwrap()
      .iter()
      .map(|w| w.id)
      .collect();
    assert_eq!(due, vec![c, a]);
    assert_eq!(get_due_count(&env.conn, now().date_naive()).unwrap(), 2);
  }

  #[test]
  fn test_list_words_by_topic() {
    let env = TestEnv::new().unwrap();
    env
      .conn
      .execute(
        "INSERT INTO topics (name, created_at) VALUES ('food', '2025-01-01T00:00:00Z')",
        [],
      )
      .unwrap();
    let topic_id = env.conn.last_insert_rowid();

    let card = WordCard::new("pan".into(), "bread".into(), now()).with_topic(Some(topic_id));
    insert_word(&env.conn, &card).unwrap();
    insert(&env.conn, "gato", "cat", now());

    assert_eq!(list_words(&env.conn, None).unwrap().len(), 2);
    let food = list_words(&env.conn, Some(topic_id)).unwrap();
    assert_eq!(food.len(), 1);
    assert_eq!(food[0].back, "bread");

    let due_food = list_due_words(&env.conn, now().date_naive(), Some(topic_id)).unwrap();
    assert_eq!(due_food.len(), 1);
  }

  #[test]
  fn test_get_words_by_ids_skips_missing() {
    let env = TestEnv::new().unwrap();
    let a = insert(&env.conn, "a", "1", now());
    let b = insert(&env.conn, "b", "2", now());

    let words = get_words_by_ids(&env.conn, &[b, 999, a]).unwrap();
    let ids: Vec<i64> = words.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![b, a]);
  }

  #[test]
  fn test_get_words_by_ids_drops_repeats() {
    let env = TestEnv::new().unwrap();
    let a = insert(&env.conn, "a", "1", now());
    let b = insert(&env.conn, "b", "2", now());

    let words = get_words_by_ids(&env.conn, &[a, b, a, a]).unwrap();
    let ids: Vec<i64> = words.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![a, b]);
  }

  #[test]
  fn test_long_interval_word_survives_save_and_load() {
    let env = TestEnv::new().unwrap();
    let id = insert(&env.conn, "der Baum", "tree", now());

    let mut word = get_word_by_id(&env.conn, id).unwrap().unwrap();
    for _ in 0..40 {
      word = srs::review_card(&word, true, now());
    }
    assert!(update_word_schedule(&env.conn, &word).unwrap());

    let stored = get_word_by_id(&env.conn, id).unwrap().unwrap();
    assert_eq!(stored, word);
    assert_eq!(srs::get_status(&stored, now()), CardStatus::Mastered);
    assert!(list_due_words(&env.conn, now().date_naive(), None).unwrap().is_empty());
  }

  #[test]
  fn test_word_due_on_last_calendar_day() {
    let env = TestEnv::new().unwrap();
    let last_day = Utc.with_ymd_and_hms(9999, 12, 31, 0, 0, 0).unwrap();
    let id = insert(&env.conn, "fin", "end", last_day);

    assert_eq!(get_word_by_id(&env.conn, id).unwrap().unwrap().next_review_at, last_day);
    let due = list_due_words(&env.conn, last_day.date_naive(), None).unwrap();
    assert_eq!(due.len(), 1);
    assert!(list_due_words(&env.conn, now().date_naive(), None).unwrap().is_empty());
  }

  #[test]
  fn test_delete_word() {
    let env = TestEnv::new().unwrap();
    let id = insert(&env.conn, "a", "1", now());
    assert!(delete_word(&env.conn, id).unwrap());
    assert!(!delete_word(&env.conn, id).unwrap());
    assert!(get_word_by_id(&env.conn, id).unwrap().is_none());
  }

  #[test]
  fn test_timestamp_roundtrip() {
    let ts = Utc.with_ymd_and_hms(2025, 12, 31, 23, 0, 0).unwrap();
    assert_eq!(format_timestamp(ts), "2025-12-31T23:00:00Z");
    assert_eq!(parse_timestamp(&format_timestamp(ts)), Some(ts));
    assert!(parse_timestamp("not a date").is_none());
  }
}
