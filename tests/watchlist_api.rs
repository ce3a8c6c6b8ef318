//! Integration tests for the client-side proxy API.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelfmark::client::api::WatchlistApi;

async fn api_against(server: &MockServer) -> WatchlistApi {
  WatchlistApi::new(&format!("{}/api/entries", server.uri())).expect("bad endpoint")
}

#[tokio::test]
async fn test_fetch_entries_maps_records() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path("/api/entries"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "records": [
        {"id": "rec001", "fields": {"id": "12345", "title": "Frieren"}},
        {"id": "rec002", "fields": {"id": 678, "title": "Mushishi"}},
        {"id": "rec003", "fields": {"title": "incomplete"}}
      ]
    })))
    .mount(&server)
    .await;

  let api = api_against(&server).await;
  let entries = api.fetch_entries().await.unwrap();

  assert_eq!(entries.len(), 2);
  assert_eq!(entries[0].series_id, "12345");
  assert_eq!(entries[0].title, "Frieren");
  assert_eq!(entries[0].record_id, "rec001");
  assert_eq!(entries[1].series_id, "678");
}

#[tokio::test]
async fn test_fetch_entries_error_status_is_an_error() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path("/api/entries"))
    .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
    .mount(&server)
    .await;

  let api = api_against(&server).await;
  let err = api.fetch_entries().await.unwrap_err();
  assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_add_sends_thin_wire_shape() {
  let server = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path("/api/entries"))
    .and(body_json(json!({"id": "12345", "title": "Frieren"})))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
    .expect(1)
    .mount(&server)
    .await;

  let api = api_against(&server).await;
  api.add("12345", "Frieren").await.unwrap();
}

#[tokio::test]
async fn test_add_failure_surfaces_status() {
  let server = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path("/api/entries"))
    .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "missing"})))
    .mount(&server)
    .await;

  let api = api_against(&server).await;
  let err = api.add("", "").await.unwrap_err();
  assert!(err.to_string().contains("400"));
}

#[tokio::test]
async fn test_remove_sends_record_ids() {
  let server = MockServer::start().await;

  Mock::given(method("DELETE"))
    .and(path("/api/entries"))
    .and(body_json(json!({"recordIds": ["rec001", "rec002"]})))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
    .expect(1)
    .mount(&server)
    .await;

  let api = api_against(&server).await;
  api
    .remove(&["rec001".to_string(), "rec002".to_string()])
    .await
    .unwrap();
}
