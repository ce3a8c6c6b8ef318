use serde::{Deserialize, Serialize};

/// One bookmarked title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
  /// Identifier on the external viewing site, used to build the deep link
  pub series_id: String,
  /// Display name and sole sort key
  pub title: String,
  /// Identifier assigned by the record store; required for deletion
  pub record_id: String,
}

impl Entry {
  /// Build the outbound deep link from a template with an `{id}` placeholder.
  pub fn watch_url(&self, template: &str) -> String {
    template.replace("{id}", &self.series_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_watch_url_substitutes_series_id() {
    let entry = Entry {
      series_id: "12345".to_string(),
      title: "Frieren".to_string(),
      record_id: "rec001".to_string(),
    };
    assert_eq!(
      entry.watch_url("https://example.tv/a/{id}"),
      "https://example.tv/a/12345"
    );
  }
}
