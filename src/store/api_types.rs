//! Serde types matching the record table's wire format.
//!
//! These types are separate from domain types to allow clean deserialization
//! of the service's record envelopes while the rest of the application works
//! with `Entry`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::store::types::Entry;

/// Deserialize an optional field that the table may hold as either a JSON
/// string or a number (creation uses `typecast`, so both occur).
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  use serde_json::Value;

  match Option::<Value>::deserialize(deserializer)? {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(Value::Number(n)) => Ok(Some(n.to_string())),
    Some(other) => Err(serde::de::Error::custom(format!(
      "expected string or number, got {}",
      other
    ))),
  }
}

// ============================================================================
// List endpoint response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiRecordList {
  #[serde(default)]
  pub records: Vec<ApiRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ApiRecord {
  /// Record identifier assigned by the store
  pub id: String,
  #[serde(default)]
  pub fields: ApiEntryFields,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiEntryFields {
  #[serde(default, deserialize_with = "opt_string_or_number")]
  pub id: Option<String>,
  #[serde(default)]
  pub title: Option<String>,
}

impl ApiRecord {
  /// Map a remote record into an entry. Records missing either field are
  /// skipped by the caller.
  pub fn into_entry(self) -> Option<Entry> {
    Some(Entry {
      series_id: self.fields.id?,
      title: self.fields.title?,
      record_id: self.id,
    })
  }
}

/// Map a full list response into entries, dropping incomplete records.
pub fn entries_from_list(list: ApiRecordList) -> Vec<Entry> {
  list
    .records
    .into_iter()
    .filter_map(ApiRecord::into_entry)
    .collect()
}

// ============================================================================
// Creation envelope
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ApiCreateRequest {
  pub records: Vec<ApiNewRecord>,
  pub typecast: bool,
}

#[derive(Debug, Serialize)]
pub struct ApiNewRecord {
  pub fields: ApiNewFields,
}

#[derive(Debug, Serialize)]
pub struct ApiNewFields {
  pub id: String,
  pub title: String,
}

impl ApiCreateRequest {
  /// Wrap one entry's fields in the store's bulk-record envelope.
  pub fn single(id: &str, title: &str) -> Self {
    Self {
      records: vec![ApiNewRecord {
        fields: ApiNewFields {
          id: id.to_string(),
          title: title.to_string(),
        },
      }],
      typecast: true,
    }
  }
}
