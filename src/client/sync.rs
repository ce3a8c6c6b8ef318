//! Pure synchronization helpers: display ordering and the structural diff
//! that decides whether a refresh replaces local state.

use crate::store::types::Entry;

/// Display order: ascending by title, case-insensitive, with a raw-title
/// tiebreak so repeated renders of the same set are identical.
pub fn sorted_for_display(entries: &[Entry]) -> Vec<Entry> {
  let mut sorted = entries.to_vec();
  sorted.sort_by(|a, b| {
    a.title
      .to_lowercase()
      .cmp(&b.title.to_lowercase())
      .then_with(|| a.title.cmp(&b.title))
      .then_with(|| a.record_id.cmp(&b.record_id))
  });
  sorted
}

/// Structural comparison against the freshly fetched list.
pub fn lists_differ(current: &[Entry], fresh: &[Entry]) -> bool {
  current != fresh
}
