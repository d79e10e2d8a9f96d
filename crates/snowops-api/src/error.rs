//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use snowops_core::ErrorKind;
use thiserror::Error;

/// An error returned by an API handler or extractor.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] snowops_core::Error),

  /// The request could not be decoded (body, path or query string).
  #[error("bad request: {0}")]
  BadRequest(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => match e.kind() {
        ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::DependencyFailure => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }

  fn message(&self) -> String {
    match self {
      ApiError::BadRequest(m) => m.clone(),
      ApiError::Core(e) => e.public_message(),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::BadRequest(format!("invalid request body: {}", rejection.body_text()))
  }
}

impl From<PathRejection> for ApiError {
  fn from(_: PathRejection) -> Self { ApiError::BadRequest("invalid id".to_owned()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    ApiError::BadRequest(format!("invalid query: {}", rejection.body_text()))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      let source = std::error::Error::source(&self).map(ToString::to_string);
      tracing::error!(error = %self, source = ?source, "request failed");
    } else {
      tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
    }
    (status, Json(json!({ "error": self.message() }))).into_response()
  }
}
