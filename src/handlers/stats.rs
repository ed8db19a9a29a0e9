use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::db::{self, CardOverview, ChallengeScore, DailyActivity};
use crate::state::AppState;

use super::ApiResult;

#[derive(Debug, Serialize)]
pub struct StatsView {
  pub streak: u32,
  pub weekly_activity: Vec<DailyActivity>,
  pub words: CardOverview,
}

pub async fn get_stats(State(state): State<AppState>) -> ApiResult<StatsView> {
  let now = Utc::now();
  let conn = db::try_lock(&state.pool)?;
  Ok(Json(StatsView {
    streak: db::get_streak(&conn, now.date_naive())?,
    weekly_activity: db::get_weekly_activity(&conn, now.date_naive())?,
    words: db::get_card_overview(&conn, now)?,
  }))
}

pub async fn get_challenge(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> ApiResult<Vec<ChallengeScore>> {
  let conn = db::try_lock(&state.pool)?;
  Ok(Json(db::get_challenge_scores(&conn, &id)?))
}
