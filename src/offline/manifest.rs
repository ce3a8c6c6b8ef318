/// The fixed, enumerated set of assets kept available offline, under a
/// versioned cache name.
#[derive(Debug, Clone)]
pub struct AssetManifest {
  version: String,
  assets: Vec<String>,
}

impl AssetManifest {
  /// Paths are normalized without a leading slash so manifest entries and
  /// intercepted request paths compare equal.
  pub fn new(version: impl Into<String>, assets: Vec<String>) -> Self {
    Self {
      version: version.into(),
      assets: assets.into_iter().map(|p| normalize(&p)).collect(),
    }
  }

  /// Name of the cache store this manifest populates.
  pub fn cache_name(&self) -> String {
    format!("shelfmark-assets-{}", self.version)
  }

  pub fn assets(&self) -> &[String] {
    &self.assets
  }

  pub fn is_empty(&self) -> bool {
    self.assets.is_empty()
  }

  pub fn contains(&self, path: &str) -> bool {
    let path = normalize(path);
    self.assets.iter().any(|a| *a == path)
  }
}

pub(crate) fn normalize(path: &str) -> String {
  path.trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cache_name_carries_version() {
    let manifest = AssetManifest::new("v2", vec![]);
    assert_eq!(manifest.cache_name(), "shelfmark-assets-v2");
  }

  #[test]
  fn test_contains_ignores_leading_slash() {
    let manifest = AssetManifest::new("v1", vec!["/index.html".to_string()]);
    assert!(manifest.contains("index.html"));
    assert!(manifest.contains("/index.html"));
    assert!(!manifest.contains("other.html"));
  }
}
