//! Integration tests for the record proxy.
//!
//! Uses wiremock as the external record store. Tests cover validation
//! (rejected before any upstream contact), verbatim status/body passthrough,
//! method dispatch, and the missing-configuration mode.

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelfmark::config::{Config, StoreConfig};
use shelfmark::proxy::{router, ProxyState};

const TABLE_PATH: &str = "/appWatchlist/Entries";

fn config_for(store_uri: &str) -> Config {
  let mut config = Config::default();
  config.proxy.store = Some(StoreConfig {
    api_url: store_uri.to_string(),
    base: "appWatchlist".to_string(),
    table: "Entries".to_string(),
  });
  config
}

/// Bind the proxy on an ephemeral port and return its base URL.
async fn spawn_proxy(config: &Config, token: Option<&str>) -> String {
  let state = Arc::new(ProxyState::new(config, token.map(String::from)));
  let app = router(state);

  let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
    .await
    .expect("failed to bind");
  let addr = listener.local_addr().expect("no local addr");

  tokio::spawn(async move {
    axum::serve(listener, app).await.expect("proxy crashed");
  });

  format!("http://{addr}")
}

#[tokio::test]
async fn test_create_then_list_round_trip() {
  let store = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path(TABLE_PATH))
    .and(body_json(json!({
      "records": [{"fields": {"id": "12345", "title": "Frieren"}}],
      "typecast": true
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "records": [{"id": "rec001", "fields": {"id": "12345", "title": "Frieren"}}]
    })))
    .expect(1)
    .mount(&store)
    .await;

  Mock::given(method("GET"))
    .and(path(TABLE_PATH))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "records": [{"id": "rec001", "fields": {"id": "12345", "title": "Frieren"}}]
    })))
    .expect(1)
    .mount(&store)
    .await;

  let proxy = spawn_proxy(&config_for(&store.uri()), Some("test-token")).await;
  let client = reqwest::Client::new();

  let created: Value = client
    .post(format!("{proxy}/api/entries"))
    .json(&json!({"id": "12345", "title": "Frieren"}))
    .send()
    .await
    .unwrap()
    .error_for_status()
    .unwrap()
    .json()
    .await
    .unwrap();
  assert_eq!(created["records"][0]["id"], "rec001");

  let listed: Value = client
    .get(format!("{proxy}/api/entries"))
    .send()
    .await
    .unwrap()
    .json()
    .await
    .unwrap();
  assert_eq!(listed["records"][0]["fields"]["title"], "Frieren");
}

#[tokio::test]
async fn test_upstream_sees_bearer_token() {
  let store = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path(TABLE_PATH))
    .and(wiremock::matchers::header(
      "authorization",
      "Bearer secret-token",
    ))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
    .expect(1)
    .mount(&store)
    .await;

  let proxy = spawn_proxy(&config_for(&store.uri()), Some("secret-token")).await;

  let status = reqwest::get(format!("{proxy}/api/entries"))
    .await
    .unwrap()
    .status();
  assert_eq!(status, 200);
}

#[tokio::test]
async fn test_create_missing_fields_is_rejected_before_upstream() {
  let store = MockServer::start().await;

  // Any upstream contact fails the test
  Mock::given(method("POST"))
    .respond_with(ResponseTemplate::new(200))
    .expect(0)
    .mount(&store)
    .await;

  let proxy = spawn_proxy(&config_for(&store.uri()), Some("test-token")).await;
  let client = reqwest::Client::new();

  for body in [json!({"title": "Frieren"}), json!({"id": "12345"}), json!({"id": "  ", "title": "x"})] {
    let response = client
      .post(format!("{proxy}/api/entries"))
      .json(&body)
      .send()
      .await
      .unwrap();

    assert_eq!(response.status(), 400, "body: {body}");
    let error: Value = response.json().await.unwrap();
    assert!(error["error"].is_string());
  }
}

#[tokio::test]
async fn test_create_accepts_numeric_id() {
  let store = MockServer::start().await;

  Mock::given(method("POST"))
    .and(path(TABLE_PATH))
    .and(body_json(json!({
      "records": [{"fields": {"id": "12345", "title": "Frieren"}}],
      "typecast": true
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
    .expect(1)
    .mount(&store)
    .await;

  let proxy = spawn_proxy(&config_for(&store.uri()), Some("test-token")).await;

  let status = reqwest::Client::new()
    .post(format!("{proxy}/api/entries"))
    .json(&json!({"id": 12345, "title": "Frieren"}))
    .send()
    .await
    .unwrap()
    .status();
  assert_eq!(status, 200);
}

#[tokio::test]
async fn test_delete_requires_record_ids() {
  let store = MockServer::start().await;

  Mock::given(method("DELETE"))
    .respond_with(ResponseTemplate::new(200))
    .expect(0)
    .mount(&store)
    .await;

  let proxy = spawn_proxy(&config_for(&store.uri()), Some("test-token")).await;
  let client = reqwest::Client::new();

  for body in [json!({}), json!({"recordIds": []})] {
    let response = client
      .delete(format!("{proxy}/api/entries"))
      .json(&body)
      .send()
      .await
      .unwrap();

    assert_eq!(response.status(), 400, "body: {body}");
  }
}

#[tokio::test]
async fn test_delete_encodes_repeated_query_params() {
  let store = MockServer::start().await;

  Mock::given(method("DELETE"))
    .and(path(TABLE_PATH))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "records": [{"id": "rec001", "deleted": true}, {"id": "rec002", "deleted": true}]
    })))
    .expect(1)
    .mount(&store)
    .await;

  let proxy = spawn_proxy(&config_for(&store.uri()), Some("test-token")).await;

  let response = reqwest::Client::new()
    .delete(format!("{proxy}/api/entries"))
    .json(&json!({"recordIds": ["rec001", "rec002"]}))
    .send()
    .await
    .unwrap();
  assert_eq!(response.status(), 200);

  let requests = store.received_requests().await.unwrap();
  let delete = requests
    .iter()
    .find(|r| r.method.as_str() == "DELETE")
    .expect("no DELETE reached the store");

  let ids: Vec<String> = delete
    .url
    .query_pairs()
    .filter(|(k, _)| k == "records[]")
    .map(|(_, v)| v.into_owned())
    .collect();
  assert_eq!(ids, vec!["rec001", "rec002"]);
}

#[tokio::test]
async fn test_malformed_json_body_is_400() {
  let store = MockServer::start().await;
  let proxy = spawn_proxy(&config_for(&store.uri()), Some("test-token")).await;

  let response = reqwest::Client::new()
    .post(format!("{proxy}/api/entries"))
    .header("content-type", "application/json")
    .body("{not json")
    .send()
    .await
    .unwrap();

  assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_other_methods_are_405() {
  let store = MockServer::start().await;
  let proxy = spawn_proxy(&config_for(&store.uri()), Some("test-token")).await;

  let response = reqwest::Client::new()
    .patch(format!("{proxy}/api/entries"))
    .send()
    .await
    .unwrap();

  assert_eq!(response.status(), 405);
  let error: Value = response.json().await.unwrap();
  assert_eq!(error["error"], "Method Not Allowed");
}

#[tokio::test]
async fn test_preflight_is_empty_200() {
  let store = MockServer::start().await;
  let proxy = spawn_proxy(&config_for(&store.uri()), Some("test-token")).await;

  let response = reqwest::Client::new()
    .request(reqwest::Method::OPTIONS, format!("{proxy}/api/entries"))
    .send()
    .await
    .unwrap();

  assert_eq!(response.status(), 200);
  assert!(response.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_configuration_is_500_on_every_request() {
  // No token resolves to no upstream
  let store = MockServer::start().await;
  let proxy = spawn_proxy(&config_for(&store.uri()), None).await;
  let client = reqwest::Client::new();

  let get = client.get(format!("{proxy}/api/entries")).send().await.unwrap();
  assert_eq!(get.status(), 500);
  let error: Value = get.json().await.unwrap();
  assert!(error["error"]
    .as_str()
    .unwrap()
    .contains("configuration missing"));

  let post = client
    .post(format!("{proxy}/api/entries"))
    .json(&json!({"id": "1", "title": "x"}))
    .send()
    .await
    .unwrap();
  assert_eq!(post.status(), 500);

  // The store was never contacted
  assert!(store.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_status_and_body_pass_through() {
  let store = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path(TABLE_PATH))
    .respond_with(ResponseTemplate::new(422).set_body_json(json!({
      "error": {"type": "INVALID_REQUEST", "message": "nope"}
    })))
    .mount(&store)
    .await;

  let proxy = spawn_proxy(&config_for(&store.uri()), Some("test-token")).await;

  let response = reqwest::get(format!("{proxy}/api/entries")).await.unwrap();
  assert_eq!(response.status(), 422);

  let body: Value = response.json().await.unwrap();
  assert_eq!(body["error"]["type"], "INVALID_REQUEST");
}
