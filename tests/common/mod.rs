//! Shared fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use poi_sync::adapters::catalog::{CatalogClient, FetchPageParams};
use poi_sync::adapters::database::{PoiRepository, UpsertResult};
use poi_sync::domain::{CanonicalDoc, CatalogError, RawRecord, Result, SyncError};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Catalog that serves a fixed list of records by offset and limit
#[derive(Debug, Default)]
pub struct ScriptedCatalog {
    records: Vec<RawRecord>,
    requests: Mutex<Vec<FetchPageParams>>,
    fail_at_offset: Option<u64>,
}

impl ScriptedCatalog {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    /// Catalog with `total` records whose IDs run from 1 to `total`
    pub fn with_total(total: u64) -> Self {
        Self::new((1..=total).map(|id| json!({ "ID": id })).collect())
    }

    /// Fails every fetch at `offset` with a 503
    pub fn failing_at(mut self, offset: u64) -> Self {
        self.fail_at_offset = Some(offset);
        self
    }

    pub fn requests(&self) -> Vec<FetchPageParams> {
        self.requests.lock().unwrap().clone()
    }

    pub fn offsets(&self) -> Vec<u64> {
        self.requests().iter().map(|p| p.offset).collect()
    }
}

#[async_trait]
impl CatalogClient for ScriptedCatalog {
    async fn fetch_page(
        &self,
        params: &FetchPageParams,
    ) -> std::result::Result<Vec<RawRecord>, CatalogError> {
        self.requests.lock().unwrap().push(params.clone());

        if self.fail_at_offset == Some(params.offset) {
            return Err(CatalogError::Http {
                status: 503,
                retry_after: None,
                url: "http://catalog.test/poi".to_string(),
            });
        }

        Ok(self
            .records
            .iter()
            .skip(params.offset as usize)
            .take(params.limit as usize)
            .cloned()
            .collect())
    }
}

/// Repository whose writes always fail
#[derive(Debug, Default)]
pub struct FailingRepository {
    pub attempts: AtomicUsize,
    pub closed: AtomicUsize,
}

#[async_trait]
impl PoiRepository for FailingRepository {
    async fn upsert_many(&self, _docs: Vec<CanonicalDoc>) -> Result<UpsertResult> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SyncError::Database("connection reset by peer".to_string()))
    }

    async fn close(&self) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
