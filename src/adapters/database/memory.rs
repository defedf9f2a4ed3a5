//! In-memory repository
//!
//! Keeps documents in a map keyed by external ID with the same upsert
//! semantics as the PostgreSQL adapter. Used by tests and for local runs
//! without a database.

use crate::adapters::database::traits::{dedupe_by_external_id, PoiRepository, UpsertResult};
use crate::domain::ids::ExternalId;
use crate::domain::record::CanonicalDoc;
use crate::domain::{Result, SyncError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Repository backed by a `BTreeMap`
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    docs: Mutex<BTreeMap<ExternalId, CanonicalDoc>>,
    batches: Mutex<Vec<Vec<ExternalId>>>,
    closed: AtomicUsize,
    dry_run: bool,
}

impl InMemoryRepository {
    /// Creates an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository that records batches but stores nothing
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.lock_docs().map(|docs| docs.len()).unwrap_or(0)
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored document for an external ID
    pub fn get(&self, external_id: ExternalId) -> Option<CanonicalDoc> {
        self.lock_docs()
            .ok()
            .and_then(|docs| docs.get(&external_id).cloned())
    }

    /// All stored documents ordered by external ID
    pub fn documents(&self) -> Vec<CanonicalDoc> {
        self.lock_docs()
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    /// External IDs of every non-empty batch received, as submitted
    pub fn batches(&self) -> Vec<Vec<ExternalId>> {
        self.batches
            .lock()
            .map(|batches| batches.clone())
            .unwrap_or_default()
    }

    /// How many times `close` was called
    pub fn close_count(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    fn lock_docs(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<ExternalId, CanonicalDoc>>> {
        self.docs
            .lock()
            .map_err(|_| SyncError::Database("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl PoiRepository for InMemoryRepository {
    async fn upsert_many(&self, docs: Vec<CanonicalDoc>) -> Result<UpsertResult> {
        if docs.is_empty() {
            return Ok(UpsertResult::default());
        }

        if let Ok(mut batches) = self.batches.lock() {
            batches.push(docs.iter().map(|d| d.external_id).collect());
        }

        if self.dry_run {
            tracing::info!(
                count = docs.len(),
                "DRY RUN: Would upsert {} documents",
                docs.len()
            );
            return Ok(UpsertResult::default());
        }

        let mut store = self.lock_docs()?;
        let mut result = UpsertResult::default();

        for doc in dedupe_by_external_id(docs) {
            match store.get_mut(&doc.external_id) {
                Some(existing) => {
                    existing.last_updated = doc.last_updated;
                    existing.raw = doc.raw;
                    result.modified += 1;
                }
                None => {
                    store.insert(doc.external_id, doc);
                    result.upserted += 1;
                }
            }
        }

        Ok(result)
    }

    async fn close(&self) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}
