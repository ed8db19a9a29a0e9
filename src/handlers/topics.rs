use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::db;
use crate::domain::{NewTopic, Topic};
use crate::state::AppState;

use super::{ApiError, ApiResult};

pub async fn list_topics(State(state): State<AppState>) -> ApiResult<Vec<Topic>> {
  let conn = db::try_lock(&state.pool)?;
  Ok(Json(db::list_topics(&conn)?))
}

pub async fn get_topic(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Topic> {
  let conn = db::try_lock(&state.pool)?;
  db::get_topic(&conn, id)?
    .map(Json)
    .ok_or(ApiError::NotFound("Topic"))
}

pub async fn create_topic(
  State(state): State<AppState>,
  Json(form): Json<NewTopic>,
) -> Result<(StatusCode, Json<Topic>), ApiError> {
  let name = form.name.trim();
  if name.is_empty() {
    return Err(ApiError::BadRequest("Topic name is required".to_string()));
  }
  let description = form
    .description
    .as_deref()
    .map(str::trim)
    .filter(|d| !d.is_empty());

  let conn = db::try_lock(&state.pool)?;
  let id = match db::insert_topic(&conn, name, description, Utc::now()) {
    Ok(id) => id,
    Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
      return Err(ApiError::BadRequest(format!("Topic '{}' already exists", name)));
    }
    Err(e) => return Err(e.into()),
  };

  tracing::info!("Created topic {} ({})", name, id);
  let topic = db::get_topic(&conn, id)?.ok_or(ApiError::NotFound("Topic"))?;
  Ok((StatusCode::CREATED, Json(topic)))
}

pub async fn delete_topic(
  State(state): State<AppState>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  let conn = db::try_lock(&state.pool)?;
  if db::delete_topic(&conn, id)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound("Topic"))
  }
}
