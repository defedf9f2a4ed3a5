//! Structured run events
//!
//! Each event is a serializable struct whose `emit` logs it through `tracing`
//! with an `event` field naming it. Logged field names match the serialized
//! (camelCase) form. Events never carry raw record content or response
//! bodies, and URLs are logged without their query string.

use crate::core::import::summary::RunSummary;
use crate::domain::errors::SkipCode;
use crate::domain::ids::ExternalId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Emitted once when a run finishes without a fatal error
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCompleted {
    pub event: &'static str,
    pub total: u64,
    pub pages_processed: u64,
    pub skipped_invalid: u64,
    pub skipped_by_code: BTreeMap<SkipCode, u64>,
    pub upserted: u64,
    pub modified: u64,
    pub dry_run: bool,
    pub duration_ms: u64,
}

impl ImportCompleted {
    pub const NAME: &'static str = "import.completed";

    pub fn emit(&self) {
        tracing::info!(
            event = Self::NAME,
            total = self.total,
            pagesProcessed = self.pages_processed,
            skippedInvalid = self.skipped_invalid,
            skippedByCode = %self.skipped_by_code_json(),
            upserted = self.upserted,
            modified = self.modified,
            dryRun = self.dry_run,
            durationMs = self.duration_ms,
            "Import completed"
        );
    }

    /// Skip counts as a JSON object keyed by skip code
    pub fn skipped_by_code_json(&self) -> serde_json::Value {
        self.skipped_by_code
            .iter()
            .map(|(code, count)| (code.as_str().to_string(), serde_json::Value::from(*count)))
            .collect::<serde_json::Map<_, _>>()
            .into()
    }
}

impl From<&RunSummary> for ImportCompleted {
    fn from(summary: &RunSummary) -> Self {
        Self {
            event: Self::NAME,
            total: summary.total,
            pages_processed: summary.pages_processed,
            skipped_invalid: summary.skipped_invalid(),
            skipped_by_code: summary.skipped_by_code.clone(),
            upserted: summary.upserted,
            modified: summary.modified,
            dry_run: summary.dry_run,
            duration_ms: summary.duration.as_millis() as u64,
        }
    }
}

/// Emitted for every record skipped as invalid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiSkipped {
    pub event: &'static str,
    pub code: SkipCode,
    pub reason: String,
    pub page: u64,
    pub offset: u64,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<ExternalId>,
}

impl PoiSkipped {
    pub const NAME: &'static str = "import.poi_skipped";

    pub fn new(
        code: SkipCode,
        reason: impl Into<String>,
        page: u64,
        offset: u64,
        page_size: u32,
        external_id: Option<ExternalId>,
    ) -> Self {
        Self {
            event: Self::NAME,
            code,
            reason: reason.into(),
            page,
            offset,
            page_size,
            external_id,
        }
    }

    pub fn emit(&self) {
        tracing::warn!(
            event = Self::NAME,
            code = %self.code,
            reason = %self.reason,
            page = self.page,
            offset = self.offset,
            pageSize = self.page_size,
            externalId = self.external_id.map(|id| id.get()),
            "POI skipped"
        );
    }
}

/// Emitted before a catalog request is retried
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRetry {
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub url: String,
    pub attempt: u32,
    pub max_attempts: u32,
    pub delay_ms: u64,
    pub reason: &'static str,
}

impl HttpRetry {
    pub const NAME: &'static str = "http.retry";

    pub fn emit(&self) {
        tracing::warn!(
            event = Self::NAME,
            status = self.status,
            url = %self.url,
            attempt = self.attempt,
            maxAttempts = self.max_attempts,
            delayMs = self.delay_ms,
            reason = self.reason,
            "Retrying catalog request"
        );
    }
}

/// Emitted when a catalog request fails for good
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpGiveUp {
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub url: String,
    pub attempt: u32,
    pub max_attempts: u32,
    pub reason: &'static str,
}

impl HttpGiveUp {
    pub const NAME: &'static str = "http.give_up";

    pub fn emit(&self) {
        tracing::error!(
            event = Self::NAME,
            status = self.status,
            url = %self.url,
            attempt = self.attempt,
            maxAttempts = self.max_attempts,
            reason = self.reason,
            "Giving up on catalog request"
        );
    }
}
