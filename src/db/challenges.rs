//! Challenge score hand-off. Scores are stored as reported; comparing them
//! is left to whoever reads them back.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};
use serde::Serialize;

use super::words::{format_timestamp, parse_timestamp};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeScore {
  pub challenge_id: String,
  pub correct_count: u32,
  pub total: u32,
  pub recorded_at: DateTime<Utc>,
}

pub fn record_challenge_score(
  conn: &Connection,
  challenge_id: &str,
  correct_count: u32,
  total: u32,
  now: DateTime<Utc>,
) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO challenge_scores (challenge_id, correct_count, total, recorded_at)
    VALUES (?1, ?2, ?3, ?4)
    "#,
    params![challenge_id, correct_count, total, format_timestamp(now)],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Scores for one challenge in the order they came in
pub fn get_challenge_scores(conn: &Connection, challenge_id: &str) -> Result<Vec<ChallengeScore>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT challenge_id, correct_count, total, recorded_at
    FROM challenge_scores
    WHERE challenge_id = ?1
    ORDER BY id ASC
    "#,
  )?;
  let scores = stmt
    .query_map(params![challenge_id], |row| {
      let recorded_at: String = row.get(3)?;
      Ok(ChallengeScore {
        challenge_id: row.get(0)?,
        correct_count: row.get(1)?,
        total: row.get(2)?,
        recorded_at: parse_timestamp(&recorded_at).unwrap_or_else(Utc::now),
      })
    })?
    .collect::<Result<Vec<_>>>()?;
  Ok(scores)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::TestEnv;
  use chrono::TimeZone;

  #[test]
  fn test_record_and_list_scores() {
    let env = TestEnv::new().unwrap();
    let now = Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap();

    record_challenge_score(&env.conn, "duel-1", 4, 5, now).unwrap();
    record_challenge_score(&env.conn, "duel-2", 1, 5, now).unwrap();
    record_challenge_score(&env.conn, "duel-1", 2, 5, now).unwrap();

    let scores = get_challenge_scores(&env.conn, "duel-1").unwrap();
    let counts: Vec<u32> = scores.iter().map(|s| s.correct_count).collect();
    assert_eq!(counts, vec![4, 2]);
    assert_eq!(scores[0].total, 5);
    assert_eq!(scores[0].recorded_at, now);

    assert!(get_challenge_scores(&env.conn, "unknown").unwrap().is_empty());
  }
}
