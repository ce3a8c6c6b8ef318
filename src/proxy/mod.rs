//! The record proxy: a stateless translation of four HTTP methods into
//! authenticated calls against the external record table, plus a versioned
//! offline cache for static assets.

pub mod error;
mod handlers;

use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use color_eyre::Result;
use tokio::net::TcpListener;
use tokio::signal::{
  ctrl_c,
  unix::{signal, SignalKind},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::offline::CacheWorker;
use crate::store::upstream::Upstream;

use error::ProxyError;

/// Shared proxy state, resolved once at startup and injected into handlers.
///
/// No per-request mutable state lives here; each invocation is independent.
pub struct ProxyState {
  /// None when any required store setting is missing; every record request
  /// then fails with a configuration error before touching the network.
  upstream: Option<Upstream>,
  /// Offline asset cache, when an asset origin is configured.
  pub assets: Option<Arc<CacheWorker>>,
}

impl ProxyState {
  /// Resolve configuration into state. A missing credential or store section
  /// does not prevent startup; it surfaces as a per-request error instead.
  pub fn new(config: &Config, token: Option<String>) -> Self {
    let upstream = match (&config.proxy.store, token) {
      (Some(store), Some(token)) => match Upstream::new(store, token) {
        Ok(upstream) => Some(upstream),
        Err(e) => {
          warn!("Record store configuration rejected: {e}");
          None
        }
      },
      _ => None,
    };

    let assets = match CacheWorker::from_config(&config.offline) {
      Ok(worker) => worker.map(Arc::new),
      Err(e) => {
        warn!("Offline asset cache disabled: {e}");
        None
      }
    };

    Self { upstream, assets }
  }

  fn store(&self) -> Result<&Upstream, ProxyError> {
    self.upstream.as_ref().ok_or(ProxyError::Configuration)
  }
}

/// Build the proxy's router around the given state.
pub fn router(state: Arc<ProxyState>) -> Router {
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
    .allow_headers([CONTENT_TYPE]);

  Router::new()
    .route(
      "/api/entries",
      get(handlers::list)
        .post(handlers::create)
        .delete(handlers::remove)
        .options(handlers::preflight)
        .fallback(handlers::method_not_allowed),
    )
    .route("/assets/{*path}", get(handlers::asset))
    .layer(cors)
    .with_state(state)
}

/// Run the proxy until interrupted.
pub async fn serve(config: Config) -> Result<()> {
  let token = Config::store_token().ok();
  let state = Arc::new(ProxyState::new(&config, token));

  if state.upstream.is_none() {
    warn!("Record store not configured; API requests will fail until it is");
  }

  // Install the new asset cache version in the background; any previously
  // activated version keeps serving until this one activates.
  if let Some(worker) = &state.assets {
    let worker = Arc::clone(worker);
    tokio::spawn(async move {
      if let Err(e) = worker.run().await {
        warn!("Asset cache install failed, previous version stays active: {e}");
      }
    });
  }

  let app = router(Arc::clone(&state));

  let listener = TcpListener::bind(&config.proxy.bind).await?;
  info!("Proxy listening on {}", config.proxy.bind);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  info!("Proxy shut down");
  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    ctrl_c().await.expect("Failed to install Ctrl+C handler");
    info!("Received Ctrl+C, shutting down");
  };

  #[cfg(unix)]
  let terminate = async {
    signal(SignalKind::terminate())
      .expect("Failed to install signal handler")
      .recv()
      .await;
    info!("Received terminate signal, shutting down");
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
}
