//! Pagination driver - orchestrates an import run
//!
//! One page is fetched, transformed and persisted before the next fetch
//! starts. The cursor advances by the raw page length, so page boundaries
//! depend only on the start offset and page size, never on how many
//! records were valid.

use crate::adapters::catalog::{CatalogClient, FetchPageParams};
use crate::adapters::database::traits::PoiRepository;
use crate::core::concurrency::ConcurrencyLimiter;
use crate::core::import::classify::{
    classify_transform_failure, wrap_repository_failure, RecordContext, TransformFailureDecision,
};
use crate::core::import::config::ImportConfig;
use crate::core::import::summary::{RunSummary, RunSummaryTracker};
use crate::core::transform::{
    parse_external_id, transform_guarded, PoiTransformer, RecordTransformer,
};
use crate::domain::errors::SyncError;
use crate::domain::record::{RawRecord, ID_FIELD};
use crate::domain::{CanonicalDoc, Result};
use crate::logging::events::ImportCompleted;
use std::sync::Arc;
use thiserror::Error;

/// A run that aborted, with the counters accumulated before the abort
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ImportFailure {
    #[source]
    pub error: SyncError,
    pub summary: RunSummary,
}

/// Page-by-page import orchestrator
pub struct PaginationDriver {
    client: Arc<dyn CatalogClient>,
    repository: Arc<dyn PoiRepository>,
    transformer: Arc<dyn RecordTransformer>,
    config: ImportConfig,
    limiter: ConcurrencyLimiter,
}

impl PaginationDriver {
    /// Creates a driver using the default [`PoiTransformer`]
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] if any bound in `config` is out
    /// of range. Nothing is fetched in that case.
    pub fn new(
        client: Arc<dyn CatalogClient>,
        repository: Arc<dyn PoiRepository>,
        config: ImportConfig,
    ) -> Result<Self> {
        let config = config.resolve()?;
        let limiter = ConcurrencyLimiter::new(config.concurrency)?;

        Ok(Self {
            client,
            repository,
            transformer: Arc::new(PoiTransformer),
            config,
            limiter,
        })
    }

    /// Replaces the record transformer
    pub fn with_transformer(mut self, transformer: Arc<dyn RecordTransformer>) -> Self {
        self.transformer = transformer;
        self
    }

    /// Resolved configuration
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Runs the import to completion
    ///
    /// The repository is closed before returning, on success and on failure.
    ///
    /// # Errors
    ///
    /// Returns [`ImportFailure`] when a fetch fails after retries, a
    /// transform fails unexpectedly, or the repository rejects a write.
    pub async fn run(&self) -> std::result::Result<RunSummary, ImportFailure> {
        let mut tracker = RunSummaryTracker::new(self.repository.is_dry_run());

        tracing::info!(
            concurrency = self.config.concurrency,
            page_size = self.config.page_size,
            max_pages = self.config.max_pages,
            start_offset = self.config.start_offset,
            dataset = self.config.dataset.as_deref(),
            modified_since = self.config.modified_since.as_deref(),
            dry_run = self.repository.is_dry_run(),
            "Starting import"
        );

        let outcome = self.process_pages(&mut tracker).await;

        if let Err(e) = self.repository.close().await {
            tracing::warn!(error = %e, "Failed to close repository");
        }

        match outcome {
            Ok(()) => {
                let summary = tracker.finish();
                ImportCompleted::from(&summary).emit();
                Ok(summary)
            }
            Err(error) => {
                let summary = tracker.finish();
                tracing::error!(
                    error = %error,
                    pages_processed = summary.pages_processed,
                    total = summary.total,
                    "Import aborted"
                );
                Err(ImportFailure { error, summary })
            }
        }
    }

    async fn process_pages(&self, tracker: &mut RunSummaryTracker) -> Result<()> {
        let page_size = self.config.page_size;
        let mut offset = self.config.start_offset;

        while tracker.pages_processed() < u64::from(self.config.max_pages) {
            let page = tracker.next_page_number();
            let params = FetchPageParams {
                offset,
                limit: page_size,
                modified_since: self.config.modified_since.clone(),
                dataset: self.config.dataset.clone(),
            };

            let records = self.client.fetch_page(&params).await?;
            if records.is_empty() {
                tracing::debug!(page, offset, "Empty page, catalog exhausted");
                break;
            }

            let raw_len = records.len();
            let docs = self.transform_page(records, page, offset, tracker).await?;
            let valid = docs.len() as u64;

            if !docs.is_empty() {
                let result = self
                    .repository
                    .upsert_many(docs)
                    .await
                    .map_err(|e| wrap_repository_failure(e, page, offset, page_size))?;
                tracker.add_imported(valid);
                tracker.add_upsert_result(&result);
            }

            tracker.add_processed_page();
            tracing::info!(
                page,
                offset,
                fetched = raw_len,
                valid,
                "Processed page"
            );

            offset = offset.saturating_add(raw_len as u64);
            if raw_len < page_size as usize {
                break;
            }
        }

        Ok(())
    }

    /// Transforms a page and reduces the outcomes in index order
    ///
    /// Skips are counted and logged as they are reduced. The first fatal
    /// outcome aborts the page before anything is written.
    async fn transform_page(
        &self,
        records: Vec<RawRecord>,
        page: u64,
        offset: u64,
        tracker: &mut RunSummaryTracker,
    ) -> Result<Vec<CanonicalDoc>> {
        let external_ids: Vec<_> = records
            .iter()
            .map(|raw| parse_external_id(raw.get(ID_FIELD)).ok())
            .collect();

        let transformer = self.transformer.as_ref();
        let tasks: Vec<_> = records
            .into_iter()
            .map(|raw| move || transform_guarded(transformer, raw))
            .collect();

        let outcomes = self.limiter.run(tasks).await;

        let mut docs = Vec::with_capacity(outcomes.len());
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(doc) => docs.push(doc),
                Err(error) => {
                    let ctx = RecordContext {
                        page,
                        offset,
                        page_size: self.config.page_size,
                        index,
                        external_id: external_ids.get(index).copied().flatten(),
                    };
                    match classify_transform_failure(error, ctx) {
                        TransformFailureDecision::Skip { code, log } => {
                            tracker.add_skipped(code);
                            log.emit();
                        }
                        TransformFailureDecision::Fail(fatal) => return Err(fatal.into()),
                    }
                }
            }
        }

        Ok(docs)
    }
}
