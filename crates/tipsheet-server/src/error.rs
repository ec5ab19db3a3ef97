//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Malformed or missing required field — most commonly an unparseable date.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// Deliberately undifferentiated: "no such user" and "wrong password" look
  /// identical to the caller, so usernames cannot be enumerated.
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("unauthorized")]
  Unauthorized,

  /// An id-targeted update, settle, or delete matched zero rows.
  #[error("tip not found")]
  NotFound,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::InvalidInput(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::InvalidCredentials => {
        (StatusCode::BAD_REQUEST, "Invalid credentials".to_string())
      }
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
      }
      ApiError::NotFound => (StatusCode::NOT_FOUND, "Tip not found".to_string()),
      ApiError::Store(e) => {
        // The driver error is logged here and never leaks to the caller.
        tracing::error!(error = %e, "store error");
        (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
