pub mod scheduler;

pub use scheduler::{
  compute_next_state, days_until_due, due_date, get_status, is_due, review_card, ScheduleUpdate,
  MASTERED_INTERVAL_DAYS, MAX_INTERVAL_DAYS, MIN_EASE_FACTOR,
};
