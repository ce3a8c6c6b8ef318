use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Per-request failure taxonomy. Every variant is terminal; nothing retries.
#[derive(Error, Debug)]
pub enum ProxyError {
  /// Caller-supplied input malformed or missing
  #[error("{0}")]
  Validation(String),

  /// Required store settings absent; checked before any network contact
  #[error("Record store configuration missing on server.")]
  Configuration,

  /// The external store was unreachable or errored below HTTP
  #[error("Failed to reach the record store: {0}")]
  Upstream(#[from] reqwest::Error),

  #[error("Method Not Allowed")]
  MethodNotAllowed,
}

impl ProxyError {
  pub fn status(&self) -> StatusCode {
    match self {
      ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
      ProxyError::Configuration | ProxyError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
      ProxyError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
    }
  }
}

impl IntoResponse for ProxyError {
  fn into_response(self) -> Response {
    (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
  }
}
