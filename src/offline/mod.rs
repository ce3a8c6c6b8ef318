//! Offline availability for a fixed set of static assets.
//!
//! A versioned on-disk store holds the enumerated asset manifest; a small
//! state machine (install, activate, fetch) populates it, evicts stale
//! versions, and serves cache-first with network fallback. Bumping the
//! configured version string is the only invalidation mechanism.

mod manifest;
mod storage;
mod worker;

pub use manifest::AssetManifest;
pub use storage::{AssetStore, StoredAsset};
pub use worker::{Asset, CacheWorker, WorkerState};
