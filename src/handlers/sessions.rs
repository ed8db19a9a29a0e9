//! Review and test sessions over HTTP.
//!
//! Each request maps onto one user action; the response always carries the
//! full view of the session so clients can render without extra round trips.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::{self, LogOnError};
use crate::domain::{SessionKind, WordCard};
use crate::session::{
  Feedback, Phase, Prompt, SessionController, SessionError, SessionRunner, SessionSummary,
};
use crate::state::{AppState, LiveSession};

use super::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
  pub kind: SessionKind,
  /// Explicit word list; takes precedence over `topic_id`
  #[serde(default)]
  pub word_ids: Option<Vec<i64>>,
  /// Every word of one topic
  #[serde(default)]
  pub topic_id: Option<i64>,
  /// Where a challenge score is filed; defaults to the session id
  #[serde(default)]
  pub challenge_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
  pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
  pub session_id: String,
  pub kind: SessionKind,
  pub phase: Phase,
  pub total: usize,
  pub correct_count: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub study_list: Option<Vec<WordCard>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prompt: Option<Prompt>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub feedback: Option<Feedback>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub summary: Option<SessionSummary>,
}

impl SessionView {
  fn new(session_id: &str, controller: &SessionController) -> Self {
    Self {
      session_id: session_id.to_string(),
      kind: controller.kind(),
      phase: controller.phase(),
      total: controller.total(),
      correct_count: controller.correct_count(),
      study_list: controller.study_list().map(|list| list.to_vec()),
      prompt: controller.prompt(),
      feedback: controller.feedback(),
      summary: controller.summary(),
    }
  }
}

fn select_words(state: &AppState, request: &StartSessionRequest) -> Result<Vec<WordCard>, ApiError> {
  let conn = db::try_lock(&state.pool)?;
  let words = match (&request.word_ids, request.topic_id) {
    (Some(ids), _) => db::get_words_by_ids(&conn, ids)?,
    (None, Some(topic_id)) => {
      if db::get_topic(&conn, topic_id)?.is_none() {
        return Err(ApiError::NotFound("Topic"));
      }
      db::list_words(&conn, Some(topic_id))?
    }
    (None, None) => db::list_due_words(&conn, Utc::now().date_naive(), None)?,
  };
  Ok(words)
}

pub async fn start_session(
  State(state): State<AppState>,
  Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
  let words = select_words(&state, &request)?;
  let total = words.len() as u32;
  let controller = SessionController::start(request.kind, words, &mut rand::rng())?;

  if request.kind != SessionKind::Challenge {
    let runner = SessionRunner::new(controller, state.store(), state.store());
    let session_id = state.sessions.insert(runner);
    let view = session_view(&state, &session_id)?;
    return Ok((StatusCode::CREATED, Json(view)));
  }

  let (runner, handle) = SessionRunner::with_challenge(controller, state.store(), state.store());
  let session_id = state.sessions.insert(runner);
  let challenge_id = request.challenge_id.unwrap_or_else(|| session_id.clone());

  // File the score once the challenge completes; nothing is filed on cancel
  let pool = state.pool.clone();
  tokio::spawn(async move {
    let Some(score) = handle.score().await else {
      tracing::debug!("Challenge {} ended without a score", challenge_id);
      return;
    };
    if let Some(conn) = db::try_lock(&pool).log_warn("Failed to lock database for challenge score") {
      db::record_challenge_score(&conn, &challenge_id, score, total, Utc::now())
        .log_warn("Failed to record challenge score");
    }
    tracing::info!("Challenge {} scored {}/{}", challenge_id, score, total);
  });

  let view = session_view(&state, &session_id)?;
  Ok((StatusCode::CREATED, Json(view)))
}

fn session_view(state: &AppState, id: &str) -> Result<SessionView, ApiError> {
  state
    .sessions
    .with_session(id, |runner| SessionView::new(id, runner.controller()))
    .ok_or(ApiError::NotFound("Session"))
}

/// Run one action against a live session and return the updated view
fn act(
  state: &AppState,
  id: &str,
  action: impl FnOnce(&mut LiveSession) -> Result<Phase, SessionError>,
) -> ApiResult<SessionView> {
  let result = state
    .sessions
    .with_session(id, |runner| {
      action(runner).map(|_| SessionView::new(id, runner.controller()))
    })
    .ok_or(ApiError::NotFound("Session"))?;
  Ok(Json(result?))
}

pub async fn get_session(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<SessionView> {
  Ok(Json(session_view(&state, &id)?))
}

pub async fn start_test(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<SessionView> {
  act(&state, &id, |runner| runner.start_test(&mut rand::rng()))
}

pub async fn submit_answer(
  State(state): State<AppState>,
  Path(id): Path<String>,
  Json(request): Json<AnswerRequest>,
) -> ApiResult<SessionView> {
  act(&state, &id, |runner| runner.submit(&request.answer, Utc::now()))
}

pub async fn reveal_answer(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> ApiResult<SessionView> {
  act(&state, &id, |runner| runner.reveal(Utc::now()))
}

pub async fn skip_word(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<SessionView> {
  act(&state, &id, |runner| runner.skip(Utc::now()))
}

pub async fn next_word(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<SessionView> {
  act(&state, &id, |runner| runner.advance())
}

/// Abandon a session. Answers already given keep their new schedule.
pub async fn cancel_session(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
  let mut runner = state.sessions.remove(&id).ok_or(ApiError::NotFound("Session"))?;
  if !runner.controller().phase().is_finished() {
    runner.cancel()?;
  }
  Ok(StatusCode::NO_CONTENT)
}
