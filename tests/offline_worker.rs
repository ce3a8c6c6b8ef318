//! Integration tests for the offline cache worker.
//!
//! Uses wiremock as the asset origin and a tempdir-backed store. Covers the
//! install/activate/fetch lifecycle: all-or-nothing population, stale-version
//! eviction, offline serving, and network forwarding for non-manifest paths.

use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelfmark::offline::{AssetManifest, AssetStore, CacheWorker, WorkerState};

fn manifest(version: &str) -> AssetManifest {
  AssetManifest::new(
    version,
    vec!["/index.html".to_string(), "/styles.css".to_string()],
  )
}

fn worker_for(origin: &str, root: &std::path::Path, version: &str) -> CacheWorker {
  let manifest = manifest(version);
  let store = AssetStore::new(root, &manifest.cache_name());
  CacheWorker::with_store(manifest, origin, store).expect("failed to build worker")
}

async fn origin_with_assets() -> MockServer {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path("/index.html"))
    .respond_with(
      ResponseTemplate::new(200)
        .set_body_string("<html>watchlist</html>")
        .insert_header("content-type", "text/html"),
    )
    .mount(&server)
    .await;

  Mock::given(method("GET"))
    .and(path("/styles.css"))
    .respond_with(
      ResponseTemplate::new(200)
        .set_body_string("body { margin: 0 }")
        .insert_header("content-type", "text/css"),
    )
    .mount(&server)
    .await;

  server
}

#[tokio::test]
async fn test_install_then_activate_serves_offline() {
  let tmp = TempDir::new().unwrap();
  let origin = origin_with_assets().await;
  let worker = worker_for(&origin.uri(), tmp.path(), "v1");

  assert_eq!(worker.state().unwrap(), WorkerState::Installing);

  worker.install().await.unwrap();
  assert_eq!(worker.state().unwrap(), WorkerState::Installed);

  worker.activate().await.unwrap();
  assert_eq!(worker.state().unwrap(), WorkerState::Activated);

  // Origin gone: every manifest path must still be servable
  drop(origin);

  let page = worker.fetch("index.html").await.unwrap();
  assert_eq!(page.status, 200);
  assert_eq!(page.content_type, "text/html");
  assert_eq!(page.body, b"<html>watchlist</html>");

  let css = worker.fetch("/styles.css").await.unwrap();
  assert_eq!(css.body, b"body { margin: 0 }");
}

#[tokio::test]
async fn test_activate_evicts_prior_versions() {
  let tmp = TempDir::new().unwrap();

  // A previously activated version left on disk
  let old = AssetStore::new(tmp.path(), "shelfmark-assets-v1");
  old.put("index.html", "text/html", b"old page").unwrap();

  let origin = origin_with_assets().await;
  let worker = worker_for(&origin.uri(), tmp.path(), "v2");

  worker.install().await.unwrap();
  worker.activate().await.unwrap();

  let store = AssetStore::new(tmp.path(), "shelfmark-assets-v2");
  assert_eq!(store.versions().unwrap(), vec!["shelfmark-assets-v2"]);

  // The new version's content serves, not the evicted one's
  let page = worker.fetch("index.html").await.unwrap();
  assert_eq!(page.body, b"<html>watchlist</html>");
}

#[tokio::test]
async fn test_failed_install_keeps_previous_version_serving() {
  let tmp = TempDir::new().unwrap();

  let old = AssetStore::new(tmp.path(), "shelfmark-assets-v1");
  old.put("index.html", "text/html", b"old page").unwrap();

  // Origin missing one manifest asset: install must fail as a whole
  let origin = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/index.html"))
    .respond_with(ResponseTemplate::new(200).set_body_string("new page"))
    .mount(&origin)
    .await;

  let worker = worker_for(&origin.uri(), tmp.path(), "v2");

  assert!(worker.install().await.is_err());
  assert_eq!(worker.state().unwrap(), WorkerState::Installing);
  assert!(worker.activate().await.is_err());

  // The old version is untouched and still answers fetches
  let page = worker.fetch("index.html").await.unwrap();
  assert_eq!(page.body, b"old page");
}

#[tokio::test]
async fn test_non_manifest_paths_always_forward() {
  let tmp = TempDir::new().unwrap();
  let origin = origin_with_assets().await;

  Mock::given(method("GET"))
    .and(path("/extra.js"))
    .respond_with(
      ResponseTemplate::new(200)
        .set_body_string("console.log(1)")
        .insert_header("content-type", "text/javascript"),
    )
    .expect(2)
    .mount(&origin)
    .await;

  let worker = worker_for(&origin.uri(), tmp.path(), "v1");
  worker.install().await.unwrap();
  worker.activate().await.unwrap();

  // Two fetches, two network hits: forwarded replies are never cached
  for _ in 0..2 {
    let asset = worker.fetch("extra.js").await.unwrap();
    assert_eq!(asset.body, b"console.log(1)");
  }

  let store = AssetStore::new(tmp.path(), "shelfmark-assets-v1");
  assert!(store.get("extra.js").unwrap().is_none());
}

#[tokio::test]
async fn test_forwarded_status_passes_through() {
  let tmp = TempDir::new().unwrap();
  let origin = origin_with_assets().await;

  Mock::given(method("GET"))
    .and(path("/missing.png"))
    .respond_with(ResponseTemplate::new(404))
    .mount(&origin)
    .await;

  let worker = worker_for(&origin.uri(), tmp.path(), "v1");
  worker.install().await.unwrap();
  worker.activate().await.unwrap();

  let asset = worker.fetch("missing.png").await.unwrap();
  assert_eq!(asset.status, 404);
}

#[tokio::test]
async fn test_transitions_out_of_order_are_rejected() {
  let tmp = TempDir::new().unwrap();
  let origin = origin_with_assets().await;
  let worker = worker_for(&origin.uri(), tmp.path(), "v1");

  // Activate before install
  assert!(worker.activate().await.is_err());
  assert_eq!(worker.state().unwrap(), WorkerState::Installing);

  worker.run().await.unwrap();
  assert_eq!(worker.state().unwrap(), WorkerState::Activated);

  // Install on an activated worker
  assert!(worker.install().await.is_err());
}
