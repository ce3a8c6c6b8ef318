//! Persisted snapshot of the watchlist.
//!
//! One JSON slot holding the last list fetched from the store, so the client
//! can render immediately on startup and keep rendering without a network.
//! The snapshot is derived state; the remote table is the source of truth.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::store::types::Entry;

/// Bump when the snapshot layout changes; older snapshots are discarded.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
  version: u32,
  saved_at: DateTime<Utc>,
  entries: Vec<Entry>,
}

/// Repository for the single snapshot slot the client persists between runs.
pub struct SnapshotRepository {
  path: PathBuf,
}

impl SnapshotRepository {
  /// Open the repository at the default location.
  pub fn open() -> Result<Self> {
    Ok(Self {
      path: Self::default_path()?,
    })
  }

  pub fn with_path(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("shelfmark").join("watchlist.json"))
  }

  /// Load the persisted list. A missing file or an unknown format version is
  /// a miss, not an error; the next refresh rebuilds it.
  pub fn load(&self) -> Result<Option<Vec<Entry>>> {
    let contents = match std::fs::read(&self.path) {
      Ok(contents) => contents,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => {
        return Err(eyre!(
          "Failed to read snapshot {}: {}",
          self.path.display(),
          e
        ))
      }
    };

    let snapshot: Snapshot = serde_json::from_slice(&contents)
      .map_err(|e| eyre!("Failed to parse snapshot {}: {}", self.path.display(), e))?;

    if snapshot.version != SNAPSHOT_VERSION {
      warn!(
        "Discarding snapshot with unknown version {} (expected {})",
        snapshot.version, SNAPSHOT_VERSION
      );
      return Ok(None);
    }

    Ok(Some(snapshot.entries))
  }

  /// Replace the snapshot with the given list.
  pub fn save(&self, entries: &[Entry]) -> Result<()> {
    let snapshot = Snapshot {
      version: SNAPSHOT_VERSION,
      saved_at: Utc::now(),
      entries: entries.to_vec(),
    };

    let data = serde_json::to_vec_pretty(&snapshot)
      .map_err(|e| eyre!("Failed to serialize snapshot: {}", e))?;

    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create snapshot directory: {}", e))?;
    }

    std::fs::write(&self.path, data)
      .map_err(|e| eyre!("Failed to write snapshot {}: {}", self.path.display(), e))?;

    Ok(())
  }
}
