//! Client-side access to the record proxy.
//!
//! The proxy owns the store credentials and envelopes; this client speaks
//! the thin `{id, title}` / `{recordIds}` surface.

use color_eyre::{eyre::eyre, Result};
use serde_json::json;
use url::Url;

use crate::store::api_types::{self, ApiRecordList};
use crate::store::types::Entry;

/// HTTP client for the proxy's single record endpoint.
#[derive(Clone)]
pub struct WatchlistApi {
  http: reqwest::Client,
  endpoint: Url,
}

impl WatchlistApi {
  pub fn new(api_url: &str) -> Result<Self> {
    let endpoint =
      Url::parse(api_url).map_err(|e| eyre!("Invalid API endpoint {}: {}", api_url, e))?;

    Ok(Self {
      http: reqwest::Client::new(),
      endpoint,
    })
  }

  /// Fetch the full remote list and map it into entries.
  pub async fn fetch_entries(&self) -> Result<Vec<Entry>> {
    let response = self
      .http
      .get(self.endpoint.clone())
      .send()
      .await
      .map_err(|e| eyre!("Failed to fetch entries: {}", e))?;

    if !response.status().is_success() {
      return Err(eyre!("API response status: {}", response.status()));
    }

    let list: ApiRecordList = response
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse entry list: {}", e))?;

    Ok(api_types::entries_from_list(list))
  }

  /// Create one entry remotely. The caller refreshes afterwards to pick up
  /// the assigned record id.
  pub async fn add(&self, series_id: &str, title: &str) -> Result<()> {
    let response = self
      .http
      .post(self.endpoint.clone())
      .json(&json!({ "id": series_id, "title": title }))
      .send()
      .await
      .map_err(|e| eyre!("Failed to add entry: {}", e))?;

    if !response.status().is_success() {
      return Err(eyre!("POST failed with status: {}", response.status()));
    }

    Ok(())
  }

  /// Delete entries by record id. Remote-first: local state is refreshed
  /// only after this succeeds.
  pub async fn remove(&self, record_ids: &[String]) -> Result<()> {
    let response = self
      .http
      .delete(self.endpoint.clone())
      .json(&json!({ "recordIds": record_ids }))
      .send()
      .await
      .map_err(|e| eyre!("Failed to delete entries: {}", e))?;

    if !response.status().is_success() {
      return Err(eyre!("DELETE failed with status: {}", response.status()));
    }

    Ok(())
  }
}
