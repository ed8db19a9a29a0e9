//! Word CRUD and due list

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db;
use crate::domain::{CardStatus, WordCard};
use crate::srs;
use crate::state::AppState;

use super::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct WordFilter {
  pub topic_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct NewWord {
  pub front: String,
  pub back: String,
  #[serde(default)]
  pub topic_id: Option<i64>,
}

/// A word plus its status as of the request time
#[derive(Debug, Serialize)]
pub struct WordView {
  #[serde(flatten)]
  pub card: WordCard,
  pub status: CardStatus,
  pub days_until_due: i64,
}

impl WordView {
  fn new(card: WordCard, now: DateTime<Utc>) -> Self {
    Self {
      status: srs::get_status(&card, now),
      days_until_due: srs::days_until_due(&card, now),
      card,
    }
  }
}

fn views(cards: Vec<WordCard>) -> Vec<WordView> {
  let now = Utc::now();
  cards.into_iter().map(|c| WordView::new(c, now)).collect()
}

pub async fn list_words(
  State(state): State<AppState>,
  Query(filter): Query<WordFilter>,
) -> ApiResult<Vec<WordView>> {
  let conn = db::try_lock(&state.pool)?;
  Ok(Json(views(db::list_words(&conn, filter.topic_id)?)))
}

pub async fn due_words(
  State(state): State<AppState>,
  Query(filter): Query<WordFilter>,
) -> ApiResult<Vec<WordView>> {
  let conn = db::try_lock(&state.pool)?;
  let due = db::list_due_words(&conn, Utc::now().date_naive(), filter.topic_id)?;
  Ok(Json(views(due)))
}

pub async fn get_word(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<WordView> {
  let conn = db::try_lock(&state.pool)?;
  let card = db::get_word_by_id(&conn, id)?.ok_or(ApiError::NotFound("Word"))?;
  Ok(Json(WordView::new(card, Utc::now())))
}

pub async fn create_word(
  State(state): State<AppState>,
  Json(form): Json<NewWord>,
) -> Result<(StatusCode, Json<WordView>), ApiError> {
  let front = form.front.trim();
  let back = form.back.trim();
  if front.is_empty() || back.is_empty() {
    return Err(ApiError::BadRequest("Both sides of the word are required".to_string()));
  }

  let conn = db::try_lock(&state.pool)?;
  if let Some(topic_id) = form.topic_id {
    if db::get_topic(&conn, topic_id)?.is_none() {
      return Err(ApiError::NotFound("Topic"));
    }
  }

  let now = Utc::now();
  let mut card = WordCard::new(front.to_string(), back.to_string(), now).with_topic(form.topic_id);
  card.id = db::insert_word(&conn, &card)?;
  tracing::debug!("Added word {} ({} -> {})", card.id, card.front, card.back);

  Ok((StatusCode::CREATED, Json(WordView::new(card, now))))
}

pub async fn delete_word(
  State(state): State<AppState>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  let conn = db::try_lock(&state.pool)?;
  if db::delete_word(&conn, id)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound("Word"))
  }
}
