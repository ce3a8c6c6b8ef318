use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Proxy endpoint the client talks to
  pub api_url: String,
  /// Deep-link template for the viewing site; `{id}` is replaced with the
  /// entry's series id
  pub watch_url: String,
  pub proxy: ProxyConfig,
  pub offline: OfflineConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api_url: default_api_url(),
      watch_url: default_watch_url(),
      proxy: ProxyConfig::default(),
      offline: OfflineConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
  /// Address the proxy binds to
  pub bind: String,
  /// External record table settings; without them every API request is
  /// answered with a configuration error
  pub store: Option<StoreConfig>,
}

impl Default for ProxyConfig {
  fn default() -> Self {
    Self {
      bind: "127.0.0.1:8017".to_string(),
      store: None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  /// Base URL of the tabular-data service
  #[serde(default = "default_store_api_url")]
  pub api_url: String,
  /// Store location identifier (the hosted base holding the table)
  pub base: String,
  /// Table identifier within the base
  pub table: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
  /// Cache version; bumping this string is the only invalidation mechanism
  pub version: String,
  /// Origin the asset manifest is fetched from; without it the asset cache
  /// is disabled
  pub origin: Option<String>,
  /// Fixed list of asset paths to keep available offline
  pub assets: Vec<String>,
}

impl Default for OfflineConfig {
  fn default() -> Self {
    Self {
      version: "v1".to_string(),
      origin: None,
      assets: Vec::new(),
    }
  }
}

fn default_api_url() -> String {
  "http://127.0.0.1:8017/api/entries".to_string()
}

fn default_watch_url() -> String {
  "https://animepahe.si/a/{id}".to_string()
}

fn default_store_api_url() -> String {
  "https://api.airtable.com/v0".to_string()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./shelfmark.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/shelfmark/config.yaml
  ///
  /// When no file exists the defaults apply: the client points at a local
  /// proxy, and the proxy runs without an upstream store (answering every
  /// record request with a configuration error until one is configured).
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => {
        info!("No configuration file found, using defaults");
        Ok(Self::default())
      }
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("shelfmark.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("shelfmark").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Get the record-store credential from environment variables.
  ///
  /// Checks SHELFMARK_STORE_TOKEN first, then AIRTABLE_API_KEY as fallback.
  pub fn store_token() -> Result<String> {
    std::env::var("SHELFMARK_STORE_TOKEN")
      .or_else(|_| std::env::var("AIRTABLE_API_KEY"))
      .map_err(|_| {
        eyre!(
          "Record store token not found. Set SHELFMARK_STORE_TOKEN or AIRTABLE_API_KEY environment variable."
        )
      })
  }
}
