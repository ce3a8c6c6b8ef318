//! The proxy's HTTP surface: four record operations plus asset serving.
//!
//! Validation happens before any upstream contact; successful upstream
//! replies are passed through with body and status unmodified.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::warn;

use super::error::ProxyError;
use super::ProxyState;
use crate::store::api_types::opt_string_or_number;
use crate::store::upstream::UpstreamResponse;

#[derive(Debug, Deserialize)]
struct CreateBody {
  #[serde(default, deserialize_with = "opt_string_or_number")]
  id: Option<String>,
  #[serde(default)]
  title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeleteBody {
  #[serde(rename = "recordIds", default)]
  record_ids: Vec<String>,
}

fn parse_body<T: serde::de::DeserializeOwned>(bytes: &Bytes) -> Result<T, ProxyError> {
  serde_json::from_slice(bytes)
    .map_err(|_| ProxyError::Validation("Invalid JSON format in request body.".to_string()))
}

/// Hand the store's reply back unmodified.
fn passthrough(response: UpstreamResponse) -> Response {
  let status =
    StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

  (
    status,
    [(header::CONTENT_TYPE, "application/json")],
    response.body,
  )
    .into_response()
}

pub async fn list(State(state): State<Arc<ProxyState>>) -> Result<Response, ProxyError> {
  let store = state.store()?;
  Ok(passthrough(store.list().await?))
}

pub async fn create(
  State(state): State<Arc<ProxyState>>,
  body: Bytes,
) -> Result<Response, ProxyError> {
  let store = state.store()?;
  let body: CreateBody = parse_body(&body)?;

  let id = body.id.as_deref().map(str::trim).filter(|s| !s.is_empty());
  let title = body.title.as_deref().map(str::trim).filter(|s| !s.is_empty());

  let (Some(id), Some(title)) = (id, title) else {
    return Err(ProxyError::Validation(
      "Missing id or title for POST request.".to_string(),
    ));
  };

  Ok(passthrough(store.create(id, title).await?))
}

pub async fn remove(
  State(state): State<Arc<ProxyState>>,
  body: Bytes,
) -> Result<Response, ProxyError> {
  let store = state.store()?;
  let body: DeleteBody = parse_body(&body)?;

  if body.record_ids.is_empty() {
    return Err(ProxyError::Validation("No record IDs provided".to_string()));
  }

  Ok(passthrough(store.delete(&body.record_ids).await?))
}

/// Cross-origin preflight: empty 200. The permissive headers come from the
/// CORS layer applied across the whole surface.
pub async fn preflight() -> StatusCode {
  StatusCode::OK
}

pub async fn method_not_allowed() -> ProxyError {
  ProxyError::MethodNotAllowed
}

/// Serve a static asset through the offline cache worker (cache-first,
/// network fallback). Disabled unless an asset origin is configured.
pub async fn asset(
  State(state): State<Arc<ProxyState>>,
  Path(path): Path<String>,
) -> Response {
  let Some(worker) = &state.assets else {
    return StatusCode::NOT_FOUND.into_response();
  };

  match worker.fetch(&path).await {
    Ok(asset) => {
      let status = StatusCode::from_u16(asset.status).unwrap_or(StatusCode::BAD_GATEWAY);
      (status, [(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response()
    }
    Err(e) => {
      warn!("Asset fetch for {} failed: {}", path, e);
      StatusCode::BAD_GATEWAY.into_response()
    }
  }
}
