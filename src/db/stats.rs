//! Study activity tracking (streaks, weekly chart, word overview)

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::{params, Connection, Result};
use serde::Serialize;
use std::collections::HashMap;

use crate::config;
use crate::domain::CardStatus;
use crate::srs;

use super::words::list_words;

/// Activity for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyActivity {
  pub day: NaiveDate,
  pub sessions: i64,
  pub words_studied: i64,
}

/// Word counts per status
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CardOverview {
  pub total: i64,
  pub due: i64,
  pub new: i64,
  pub learning: i64,
  pub mastered: i64,
}

fn day_key(day: NaiveDate) -> String {
  day.format("%Y-%m-%d").to_string()
}

/// Count one finished session against `today`
pub fn record_study_session(conn: &Connection, words_studied: u32, today: NaiveDate) -> Result<()> {
  conn.execute(
    r#"
    INSERT INTO study_activity (day, sessions, words_studied)
    VALUES (?1, 1, ?2)
    ON CONFLICT(day) DO UPDATE SET
      sessions = sessions + 1,
      words_studied = words_studied + excluded.words_studied
    "#,
    params![day_key(today), words_studied],
  )?;
  Ok(())
}

/// Consecutive active days ending today, or ending yesterday if nothing
/// has been studied yet today
pub fn get_streak(conn: &Connection, today: NaiveDate) -> Result<u32> {
  let mut stmt = conn.prepare(
    "SELECT day FROM study_activity WHERE day <= ?1 AND sessions > 0 ORDER BY day DESC",
  )?;
  let days = stmt
    .query_map(params![day_key(today)], |row| row.get::<_, String>(0))?
    .collect::<Result<Vec<_>>>()?;

  let days: Vec<NaiveDate> = days
    .iter()
    .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    .collect();

  let mut expected = match days.first() {
    Some(&first) if first == today => today,
    Some(&first) if first == today - Duration::days(1) => first,
    _ => return Ok(0),
  };

  let mut streak = 0;
  for day in days {
    if day != expected {
      break;
    }
    streak += 1;
    expected -= Duration::days(1);
  }
  Ok(streak)
}

/// Activity for the last `ACTIVITY_WINDOW_DAYS` days, oldest first, with
/// empty days filled in
pub fn get_weekly_activity(conn: &Connection, today: NaiveDate) -> Result<Vec<DailyActivity>> {
  let start = today - Duration::days(config::ACTIVITY_WINDOW_DAYS - 1);

  let mut stmt = conn.prepare(
    "SELECT day, sessions, words_studied FROM study_activity WHERE day >= ?1 AND day <= ?2",
  )?;
  let recorded: HashMap<String, (i64, i64)> = stmt
    .query_map(params![day_key(start), day_key(today)], |row| {
      Ok((row.get::<_, String>(0)?, (row.get(1)?, row.get(2)?)))
    })?
    .collect::<Result<HashMap<_, _>>>()?;

  Ok(
    (0..config::ACTIVITY_WINDOW_DAYS)
      .map(|offset| {
        let day = start + Duration::days(offset);
        let (sessions, words_studied) = recorded.get(&day_key(day)).copied().unwrap_or((0, 0));
        DailyActivity {
          day,
          sessions,
          words_studied,
        }
      })
      .collect(),
  )
}

pub fn get_card_overview(conn: &Connection, now: DateTime<Utc>) -> Result<CardOverview> {
  let mut overview = CardOverview::default();
  for word in list_words(conn, None)? {
    overview.total += 1;
    match srs::get_status(&word, now) {
      CardStatus::Due => overview.due += 1,
      CardStatus::New => overview.new += 1,
      CardStatus::Learning => overview.learning += 1,
      CardStatus::Mastered => overview.mastered += 1,
    }
  }
  Ok(overview)
}
