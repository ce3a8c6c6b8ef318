//! Versioned on-disk store for cached assets.
//!
//! Layout: `<root>/<cache-name>/<sha256(path)>.bin` for content, with a
//! `.json` metadata sidecar per asset. Lookups check the current version
//! first, then any older version still on disk (old versions survive until
//! a newly installed version activates and evicts them).

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use super::manifest::normalize;

/// Metadata sidecar stored alongside each cached asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetMeta {
  /// Normalized asset path
  pub path: String,
  pub content_type: String,
  pub cached_at: DateTime<Utc>,
}

/// A cached asset read back from disk.
#[derive(Debug, Clone)]
pub struct StoredAsset {
  pub meta: AssetMeta,
  pub body: Vec<u8>,
}

/// Asset store pinned to one cache version.
#[derive(Debug, Clone)]
pub struct AssetStore {
  root: PathBuf,
  version: String,
}

impl AssetStore {
  /// Open the store at the default location for the given cache name.
  pub fn open(version: &str) -> Result<Self> {
    let root = Self::default_root()?;
    Ok(Self::new(root, version))
  }

  pub fn new(root: impl Into<PathBuf>, version: &str) -> Self {
    Self {
      root: root.into(),
      version: version.to_string(),
    }
  }

  fn default_root() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("shelfmark").join("assets"))
  }

  /// Stable cache key for an asset path.
  fn key(path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(path).as_bytes());
    hex::encode(hasher.finalize())
  }

  fn version_dir(&self) -> PathBuf {
    self.root.join(&self.version)
  }

  /// Store an asset under the current version.
  pub fn put(&self, path: &str, content_type: &str, body: &[u8]) -> Result<()> {
    let dir = self.version_dir();
    std::fs::create_dir_all(&dir)
      .map_err(|e| eyre!("Failed to create cache directory {}: {}", dir.display(), e))?;

    let key = Self::key(path);
    let meta = AssetMeta {
      path: normalize(path),
      content_type: content_type.to_string(),
      cached_at: Utc::now(),
    };

    let meta_json = serde_json::to_vec(&meta)
      .map_err(|e| eyre!("Failed to serialize asset metadata: {}", e))?;

    std::fs::write(dir.join(format!("{key}.bin")), body)
      .map_err(|e| eyre!("Failed to write cached asset {}: {}", path, e))?;
    std::fs::write(dir.join(format!("{key}.json")), meta_json)
      .map_err(|e| eyre!("Failed to write asset metadata {}: {}", path, e))?;

    Ok(())
  }

  /// Look an asset up across cache versions, current first.
  pub fn get(&self, path: &str) -> Result<Option<StoredAsset>> {
    let key = Self::key(path);

    if let Some(asset) = Self::read_from(&self.version_dir(), &key)? {
      return Ok(Some(asset));
    }

    for version in self.versions()? {
      if version == self.version {
        continue;
      }
      if let Some(asset) = Self::read_from(&self.root.join(&version), &key)? {
        return Ok(Some(asset));
      }
    }

    Ok(None)
  }

  fn read_from(dir: &Path, key: &str) -> Result<Option<StoredAsset>> {
    let body_path = dir.join(format!("{key}.bin"));
    if !body_path.exists() {
      return Ok(None);
    }

    let body = std::fs::read(&body_path)
      .map_err(|e| eyre!("Failed to read cached asset {}: {}", body_path.display(), e))?;

    let meta_path = dir.join(format!("{key}.json"));
    let meta_json = std::fs::read(&meta_path)
      .map_err(|e| eyre!("Failed to read asset metadata {}: {}", meta_path.display(), e))?;
    let meta: AssetMeta = serde_json::from_slice(&meta_json)
      .map_err(|e| eyre!("Failed to parse asset metadata {}: {}", meta_path.display(), e))?;

    Ok(Some(StoredAsset { meta, body }))
  }

  /// All cache versions currently on disk.
  pub fn versions(&self) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(&self.root) {
      Ok(entries) => entries,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => {
        return Err(eyre!(
          "Failed to read cache root {}: {}",
          self.root.display(),
          e
        ))
      }
    };

    let mut versions = Vec::new();
    for entry in entries {
      let entry = entry.map_err(|e| eyre!("Failed to read cache root entry: {}", e))?;
      if entry.path().is_dir() {
        versions.push(entry.file_name().to_string_lossy().into_owned());
      }
    }

    Ok(versions)
  }

  /// Delete every cache version except the current one. Returns the evicted
  /// version names.
  pub fn evict_others(&self) -> Result<Vec<String>> {
    let mut evicted = Vec::new();

    for version in self.versions()? {
      if version == self.version {
        continue;
      }
      let dir = self.root.join(&version);
      std::fs::remove_dir_all(&dir)
        .map_err(|e| eyre!("Failed to evict cache {}: {}", dir.display(), e))?;
      evicted.push(version);
    }

    Ok(evicted)
  }
}
