use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::domain::{CardStatus, WordCard, DEFAULT_EASE_FACTOR};

pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease gained per correct answer. There is no upper bound.
pub const EASE_BONUS: f64 = 0.1;

/// Ease lost per miss, floored at `MIN_EASE_FACTOR`
pub const EASE_PENALTY: f64 = 0.2;

/// Interval (days) at which a card counts as mastered
pub const MASTERED_INTERVAL_DAYS: u32 = 21;

/// Longest interval a card can reach. Ease keeps growing past this point,
/// the interval does not.
pub const MAX_INTERVAL_DAYS: u32 = 1_000_000;

/// Scheduling fields produced by a single answer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleUpdate {
  pub ease_factor: f64,
  pub interval_days: u32,
  pub repetitions: u32,
  pub next_review_at: DateTime<Utc>,
  pub last_reviewed_at: DateTime<Utc>,
}

fn sanitized_ease(ease_factor: f64) -> f64 {
  if !ease_factor.is_finite() {
    DEFAULT_EASE_FACTOR
  } else {
    ease_factor.max(MIN_EASE_FACTOR)
  }
}

/// Latest due time that still fits a four-digit RFC 3339 year
fn latest_review_at() -> DateTime<Utc> {
  NaiveDate::from_ymd_opt(9999, 12, 31)
    .map(|day| day.and_time(NaiveTime::MIN).and_utc())
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn next_review_after(now: DateTime<Utc>, interval_days: u32) -> DateTime<Utc> {
  let latest = latest_review_at().max(now);
  now
    .checked_add_signed(Duration::days(i64::from(interval_days)))
    .map_or(latest, |due| due.min(latest))
}

/// Fixed-step SM-2 variant: 1 day, then 3 days, then `interval * ease`.
///
/// A miss sends the card back to interval 0 (due again right away) and
/// drops the ease by `EASE_PENALTY`.
pub fn compute_next_state(card: &WordCard, is_correct: bool, now: DateTime<Utc>) -> ScheduleUpdate {
  let ease = sanitized_ease(card.ease_factor);

  let (ease_factor, interval_days, repetitions) = if is_correct {
    let interval = match card.repetitions {
      0 => 1,
      1 => 3,
      // Uses the ease from before this answer's bonus
      _ => ((card.interval_days as f64) * ease).round() as u32,
    }
    .min(MAX_INTERVAL_DAYS);
    (ease + EASE_BONUS, interval, card.repetitions.saturating_add(1))
  } else {
    ((ease - EASE_PENALTY).max(MIN_EASE_FACTOR), 0, 0)
  };

  ScheduleUpdate {
    ease_factor,
    interval_days,
    repetitions,
    next_review_at: next_review_after(now, interval_days),
    last_reviewed_at: now,
  }
}

/// Apply one answer to a card, including its lifetime counters.
pub fn review_card(card: &WordCard, is_correct: bool, now: DateTime<Utc>) -> WordCard {
  let update = compute_next_state(card, is_correct, now);
  let mut next = card.clone();
  next.ease_factor = update.ease_factor;
  next.interval_days = update.interval_days;
  next.repetitions = update.repetitions;
  next.next_review_at = update.next_review_at;
  next.last_reviewed_at = Some(update.last_reviewed_at);
  if is_correct {
    next.correct_count = next.correct_count.saturating_add(1);
  } else {
    next.wrong_count = next.wrong_count.saturating_add(1);
  }
  next
}

/// Calendar date a card falls due, time of day dropped
pub fn due_date(card: &WordCard) -> NaiveDate {
  card.next_review_at.date_naive()
}

pub fn is_due(card: &WordCard, now: DateTime<Utc>) -> bool {
  due_date(card) <= now.date_naive()
}

/// Classify a card. Being due wins over every other status.
pub fn get_status(card: &WordCard, now: DateTime<Utc>) -> CardStatus {
  if is_due(card, now) {
    CardStatus::Due
  } else if card.repetitions == 0 && card.interval_days == 0 {
    // Only reachable when a new card was seeded with a future due date
    CardStatus::New
  } else if card.interval_days >= MASTERED_INTERVAL_DAYS {
    CardStatus::Mastered
  } else {
    CardStatus::Learning
  }
}

pub fn days_until_due(card: &WordCard, now: DateTime<Utc>) -> i64 {
  (due_date(card) - now.date_naive()).num_days().max(0)
}
