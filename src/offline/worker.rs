//! Install/activate/fetch lifecycle for the offline asset cache.

use color_eyre::{eyre::eyre, Result};
use std::sync::RwLock;
use tracing::info;
use url::Url;

use crate::config::OfflineConfig;

use super::manifest::AssetManifest;
use super::storage::AssetStore;

/// Lifecycle states of one cache version.
///
/// A version must finish populating before it may activate, and stale
/// versions are evicted before the new one claims traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
  Installing,
  Installed,
  Activating,
  Activated,
}

/// An asset ready to serve: cached copies are always 200, forwarded network
/// replies keep their upstream status.
#[derive(Debug, Clone)]
pub struct Asset {
  pub status: u16,
  pub content_type: String,
  pub body: Vec<u8>,
}

/// The cache worker for one manifest version.
pub struct CacheWorker {
  manifest: AssetManifest,
  store: AssetStore,
  origin: Url,
  http: reqwest::Client,
  state: RwLock<WorkerState>,
}

impl CacheWorker {
  /// Build a worker from configuration. Returns None when the asset cache is
  /// not configured (no origin or an empty manifest).
  pub fn from_config(config: &OfflineConfig) -> Result<Option<Self>> {
    let Some(origin) = &config.origin else {
      return Ok(None);
    };

    let manifest = AssetManifest::new(config.version.clone(), config.assets.clone());
    if manifest.is_empty() {
      return Ok(None);
    }

    let store = AssetStore::open(&manifest.cache_name())?;
    Ok(Some(Self::with_store(manifest, origin, store)?))
  }

  /// Build a worker over an explicit store. The origin gains a trailing
  /// slash so asset paths join below it rather than replacing its path.
  pub fn with_store(manifest: AssetManifest, origin: &str, store: AssetStore) -> Result<Self> {
    let mut origin = origin.to_string();
    if !origin.ends_with('/') {
      origin.push('/');
    }
    let origin = Url::parse(&origin).map_err(|e| eyre!("Invalid asset origin {}: {}", origin, e))?;

    Ok(Self {
      manifest,
      store,
      origin,
      http: reqwest::Client::new(),
      state: RwLock::new(WorkerState::Installing),
    })
  }

  pub fn state(&self) -> Result<WorkerState> {
    Ok(*self.state.read().map_err(|e| eyre!("Lock poisoned: {}", e))?)
  }

  fn advance(&self, from: WorkerState, to: WorkerState) -> Result<()> {
    let mut state = self.state.write().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    if *state != from {
      return Err(eyre!(
        "Invalid transition {:?} -> {:?} from {:?}",
        from,
        to,
        *state
      ));
    }
    *state = to;
    Ok(())
  }

  /// Populate the store with every manifest asset, fetched concurrently.
  ///
  /// All-or-nothing: a single failed fetch aborts the install before any
  /// write, so a partially populated version never activates and whatever
  /// version is already on disk keeps serving.
  pub async fn install(&self) -> Result<()> {
    if self.state()? != WorkerState::Installing {
      return Err(eyre!("Install is only valid on a fresh worker"));
    }

    let fetches = self.manifest.assets().iter().map(|path| self.fetch_origin(path));
    let results = futures::future::join_all(fetches).await;

    let mut fetched = Vec::with_capacity(results.len());
    for (path, result) in self.manifest.assets().iter().zip(results) {
      let asset = result.map_err(|e| eyre!("Failed to cache {}: {}", path, e))?;
      fetched.push((path, asset));
    }

    for (path, asset) in fetched {
      self.store.put(path, &asset.content_type, &asset.body)?;
    }

    self.advance(WorkerState::Installing, WorkerState::Installed)?;
    info!(
      "Installed {} with {} assets",
      self.manifest.cache_name(),
      self.manifest.assets().len()
    );
    Ok(())
  }

  /// Evict every other cache version, then begin serving immediately.
  pub async fn activate(&self) -> Result<()> {
    self.advance(WorkerState::Installed, WorkerState::Activating)?;

    let evicted = self.store.evict_others()?;
    if !evicted.is_empty() {
      info!("Evicted stale asset caches: {:?}", evicted);
    }

    self.advance(WorkerState::Activating, WorkerState::Activated)?;
    info!("Activated {}", self.manifest.cache_name());
    Ok(())
  }

  /// Full lifecycle for this version, run in the background at startup.
  pub async fn run(&self) -> Result<()> {
    self.install().await?;
    self.activate().await
  }

  /// Serve-or-forward: a cached copy if any version on disk holds one,
  /// otherwise the origin over the network. Forwarded replies are not
  /// cached; only install populates the store.
  pub async fn fetch(&self, path: &str) -> Result<Asset> {
    if let Some(stored) = self.store.get(path)? {
      return Ok(Asset {
        status: 200,
        content_type: stored.meta.content_type,
        body: stored.body,
      });
    }

    self.forward(path).await
  }

  /// Fetch one manifest asset for install; a non-success reply fails the
  /// install the way a failed download would.
  async fn fetch_origin(&self, path: &str) -> Result<Asset> {
    let asset = self.forward(path).await?;
    if !(200..300).contains(&asset.status) {
      return Err(eyre!("Origin answered {}", asset.status));
    }
    Ok(asset)
  }

  async fn forward(&self, path: &str) -> Result<Asset> {
    let url = self
      .origin
      .join(super::manifest::normalize(path).as_str())
      .map_err(|e| eyre!("Invalid asset path {}: {}", path, e))?;

    let response = self
      .http
      .get(url)
      .send()
      .await
      .map_err(|e| eyre!("Failed to fetch {}: {}", path, e))?;

    let status = response.status().as_u16();
    let content_type = response
      .headers()
      .get(reqwest::header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .unwrap_or("application/octet-stream")
      .to_string();
    let body = response
      .bytes()
      .await
      .map_err(|e| eyre!("Failed to read {}: {}", path, e))?
      .to_vec();

    Ok(Asset {
      status,
      content_type,
      body,
    })
  }
}
