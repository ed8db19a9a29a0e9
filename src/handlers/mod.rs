pub mod sessions;
pub mod stats;
pub mod topics;
pub mod words;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::db::StoreError;
use crate::session::SessionError;
use crate::state::AppState;

/// Error returned by every JSON handler, rendered as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
  NotFound(&'static str),
  BadRequest(String),
  Session(SessionError),
  Store(StoreError),
}

impl From<SessionError> for ApiError {
  fn from(e: SessionError) -> Self {
    Self::Session(e)
  }
}

impl From<StoreError> for ApiError {
  fn from(e: StoreError) -> Self {
    Self::Store(e)
  }
}

impl From<rusqlite::Error> for ApiError {
  fn from(e: rusqlite::Error) -> Self {
    Self::Store(StoreError::Sqlite(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
      Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
      // User-facing warnings, not failures
      Self::Session(e @ (SessionError::EmptyQueue | SessionError::InvalidAnswerInput)) => {
        (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
      }
      Self::Session(e @ SessionError::InvalidAction { .. }) => (StatusCode::CONFLICT, e.to_string()),
      Self::Store(e) => {
        tracing::error!("{}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
      }
    };
    (status, Json(serde_json::json!({ "error": message }))).into_response()
  }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/topics", get(topics::list_topics).post(topics::create_topic))
    .route("/api/topics/{id}", get(topics::get_topic).delete(topics::delete_topic))
    .route("/api/words", get(words::list_words).post(words::create_word))
    .route("/api/words/due", get(words::due_words))
    .route("/api/words/{id}", get(words::get_word).delete(words::delete_word))
    .route("/api/sessions", post(sessions::start_session))
    .route(
      "/api/sessions/{id}",
      get(sessions::get_session).delete(sessions::cancel_session),
    )
    .route("/api/sessions/{id}/start-test", post(sessions::start_test))
    .route("/api/sessions/{id}/answer", post(sessions::submit_answer))
    .route("/api/sessions/{id}/reveal", post(sessions::reveal_answer))
    .route("/api/sessions/{id}/skip", post(sessions::skip_word))
    .route("/api/sessions/{id}/next", post(sessions::next_word))
    .route("/api/stats", get(stats::get_stats))
    .route("/api/challenges/{id}", get(stats::get_challenge))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
