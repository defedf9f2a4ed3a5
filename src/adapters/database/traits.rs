//! Repository abstraction
//!
//! This module defines the trait that document-store adapters must implement
//! to receive imported POIs, plus the in-batch deduplication every
//! implementation applies before writing.

use crate::domain::ids::ExternalId;
use crate::domain::record::CanonicalDoc;
use crate::domain::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;

/// Result of a bulk upsert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertResult {
    /// Documents inserted for the first time
    pub upserted: u64,

    /// Existing documents that were overwritten
    pub modified: u64,
}

impl UpsertResult {
    /// Creates a result from optional driver counts, treating missing as zero
    pub fn from_counts(upserted: Option<u64>, modified: Option<u64>) -> Self {
        Self {
            upserted: upserted.unwrap_or(0),
            modified: modified.unwrap_or(0),
        }
    }
}

/// Idempotent sink for canonical documents
///
/// Implementations key every write by [`CanonicalDoc::external_id`]:
/// - the surrogate `id` is written on insert only and never replaced
/// - `last_updated` and `raw` are overwritten on every write
///
/// Writes within one batch need not be atomic across documents.
#[async_trait]
pub trait PoiRepository: Send + Sync {
    /// Upsert a batch of documents
    ///
    /// The batch may contain duplicate external IDs; the last occurrence wins.
    /// An empty batch is a no-op and must not open a connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store rejects the write.
    async fn upsert_many(&self, docs: Vec<CanonicalDoc>) -> Result<UpsertResult>;

    /// Release any connection held by the repository
    ///
    /// Safe to call more than once and when nothing was ever opened.
    async fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Whether writes are only simulated
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Drops duplicate external IDs, keeping the last occurrence of each
///
/// Surviving documents stay in submission order. Applying this twice gives the
/// same result as applying it once.
///
/// # Examples
///
/// ```
/// use poi_sync::adapters::database::dedupe_by_external_id;
/// use poi_sync::domain::{CanonicalDoc, ExternalId};
/// use serde_json::json;
///
/// let id = ExternalId::new(1).unwrap();
/// let docs = vec![
///     CanonicalDoc::new(id, None, json!({"ID": 1, "v": "old"})),
///     CanonicalDoc::new(id, None, json!({"ID": 1, "v": "new"})),
/// ];
///
/// let kept = dedupe_by_external_id(docs);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].raw["v"], "new");
/// ```
pub fn dedupe_by_external_id(docs: Vec<CanonicalDoc>) -> Vec<CanonicalDoc> {
    let mut seen: HashSet<ExternalId> = HashSet::with_capacity(docs.len());
    let mut kept: Vec<CanonicalDoc> = docs
        .into_iter()
        .rev()
        .filter(|doc| seen.insert(doc.external_id))
        .collect();
    kept.reverse();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: u64, tag: &str) -> CanonicalDoc {
        CanonicalDoc::new(ExternalId::new(id).unwrap(), None, json!({"ID": id, "tag": tag}))
    }

    fn tags(docs: &[CanonicalDoc]) -> Vec<String> {
        docs.iter()
            .map(|d| d.raw["tag"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_dedupe_keeps_last_occurrence() {
        let docs = vec![doc(1, "a"), doc(2, "b"), doc(1, "c"), doc(3, "d"), doc(2, "e")];
        let kept = dedupe_by_external_id(docs);
        assert_eq!(tags(&kept), vec!["c", "d", "e"]);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let docs = vec![doc(5, "x"), doc(5, "y"), doc(6, "z")];
        let once = dedupe_by_external_id(docs);
        let twice = dedupe_by_external_id(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dedupe_without_duplicates_is_identity() {
        let docs = vec![doc(1, "a"), doc(2, "b")];
        let kept = dedupe_by_external_id(docs.clone());
        assert_eq!(kept, docs);
    }

    #[test]
    fn test_dedupe_empty() {
        assert!(dedupe_by_external_id(Vec::new()).is_empty());
    }

    #[test]
    fn test_missing_counts_are_zero() {
        assert_eq!(UpsertResult::from_counts(None, Some(2)), UpsertResult { upserted: 0, modified: 2 });
    }
}
