//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. The display string is the message
/// sent to the client.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Conflict(String),

  /// Details were logged where the failure happened.
  #[error("Internal Error")]
  Internal,
}

impl ApiError {
  /// Several endpoints report a missing fun fact as 400 rather than 404.
  pub fn not_found_as_bad_request(self) -> Self {
    match self {
      ApiError::NotFound(m) => ApiError::BadRequest(m),
      other => other,
    }
  }
}

impl From<statefacts_core::Error> for ApiError {
  fn from(e: statefacts_core::Error) -> Self {
    use statefacts_core::Error;
    match e {
      Error::InvalidInput(m) => ApiError::BadRequest(m),
      Error::NotFound(m) => ApiError::NotFound(m),
      e @ Error::AlreadyExists(_) => ApiError::Conflict(e.to_string()),
      Error::Storage(_) | Error::Dataset(_) | Error::DuplicateCode(_) => {
        ApiError::Internal
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "message": self.to_string() }))).into_response()
  }
}
