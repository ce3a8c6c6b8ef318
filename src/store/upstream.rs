//! Authenticated access to the external record table.
//!
//! The proxy hands the caller whatever the store answered, so every call
//! returns the raw status and body rather than parsed types.

use color_eyre::{eyre::eyre, Result};
use url::Url;

use crate::config::StoreConfig;
use crate::store::api_types::ApiCreateRequest;

/// Raw reply from the record table, passed through to the proxy caller
/// verbatim.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
  pub status: u16,
  pub body: Vec<u8>,
}

/// Client for the record table, bound to one base and one table.
#[derive(Clone)]
pub struct Upstream {
  http: reqwest::Client,
  table_url: Url,
  token: String,
}

impl Upstream {
  pub fn new(store: &StoreConfig, token: String) -> Result<Self> {
    let raw = format!(
      "{}/{}/{}",
      store.api_url.trim_end_matches('/'),
      store.base,
      store.table
    );
    let table_url =
      Url::parse(&raw).map_err(|e| eyre!("Invalid store table URL {}: {}", raw, e))?;

    Ok(Self {
      http: reqwest::Client::new(),
      table_url,
      token,
    })
  }

  async fn send(&self, request: reqwest::RequestBuilder) -> reqwest::Result<UpstreamResponse> {
    let response = request.bearer_auth(&self.token).send().await?;
    let status = response.status().as_u16();
    let body = response.bytes().await?.to_vec();

    Ok(UpstreamResponse { status, body })
  }

  /// Full table read. No pagination or filtering; the table holds one
  /// person's watchlist.
  pub async fn list(&self) -> reqwest::Result<UpstreamResponse> {
    self.send(self.http.get(self.table_url.clone())).await
  }

  /// Create one record, wrapped in the store's bulk envelope.
  pub async fn create(&self, id: &str, title: &str) -> reqwest::Result<UpstreamResponse> {
    let envelope = ApiCreateRequest::single(id, title);
    self
      .send(self.http.post(self.table_url.clone()).json(&envelope))
      .await
  }

  /// Bulk delete. The table API takes each id as a repeated `records[]`
  /// query parameter.
  pub async fn delete(&self, record_ids: &[String]) -> reqwest::Result<UpstreamResponse> {
    let query: Vec<(&str, &str)> = record_ids
      .iter()
      .map(|id| ("records[]", id.as_str()))
      .collect();

    self
      .send(self.http.delete(self.table_url.clone()).query(&query))
      .await
  }
}
