//! Run summary and reporting
//!
//! The tracker is created fresh for each run and owned by the driver. Its
//! counters only grow; on abort the summary reflects work completed strictly
//! before the failure.

use crate::adapters::database::traits::UpsertResult;
use crate::domain::errors::SkipCode;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Summary of an import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Valid documents handed to the repository
    pub total: u64,

    /// Pages fully processed
    pub pages_processed: u64,

    /// Skipped records per code
    pub skipped_by_code: BTreeMap<SkipCode, u64>,

    /// Documents inserted for the first time
    pub upserted: u64,

    /// Existing documents overwritten
    pub modified: u64,

    /// Whether repository writes were simulated
    pub dry_run: bool,

    /// Wall-clock duration of the run
    #[serde(skip)]
    pub duration: Duration,
}

impl RunSummary {
    /// Records skipped as invalid
    pub fn skipped_invalid(&self) -> u64 {
        self.skipped_by_code
            .get(&SkipCode::InvalidRecord)
            .copied()
            .unwrap_or(0)
    }
}

/// Accumulates counters for one run
#[derive(Debug)]
pub struct RunSummaryTracker {
    summary: RunSummary,
    started: Instant,
}

impl RunSummaryTracker {
    pub fn new(dry_run: bool) -> Self {
        Self {
            summary: RunSummary {
                dry_run,
                ..Default::default()
            },
            started: Instant::now(),
        }
    }

    pub fn pages_processed(&self) -> u64 {
        self.summary.pages_processed
    }

    /// 1-based number of the page about to be fetched
    pub fn next_page_number(&self) -> u64 {
        self.summary.pages_processed + 1
    }

    pub fn add_imported(&mut self, count: u64) {
        self.summary.total += count;
    }

    pub fn add_processed_page(&mut self) {
        self.summary.pages_processed += 1;
    }

    /// Counts a skipped record and returns the new count for its code
    pub fn add_skipped(&mut self, code: SkipCode) -> u64 {
        let count = self.summary.skipped_by_code.entry(code).or_insert(0);
        *count += 1;
        *count
    }

    pub fn add_upsert_result(&mut self, result: &UpsertResult) {
        self.summary.upserted += result.upserted;
        self.summary.modified += result.modified;
    }

    /// Consumes the tracker, stamping the final duration
    pub fn finish(self) -> RunSummary {
        RunSummary {
            duration: self.started.elapsed(),
            ..self.summary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut tracker = RunSummaryTracker::new(false);
        assert_eq!(tracker.next_page_number(), 1);

        tracker.add_imported(8);
        tracker.add_processed_page();
        assert_eq!(tracker.add_skipped(SkipCode::InvalidRecord), 1);
        assert_eq!(tracker.add_skipped(SkipCode::InvalidRecord), 2);
        tracker.add_upsert_result(&UpsertResult {
            upserted: 5,
            modified: 3,
        });

        assert_eq!(tracker.pages_processed(), 1);
        assert_eq!(tracker.next_page_number(), 2);

        let summary = tracker.finish();
        assert_eq!(summary.total, 8);
        assert_eq!(summary.pages_processed, 1);
        assert_eq!(summary.skipped_invalid(), 2);
        assert_eq!(summary.upserted, 5);
        assert_eq!(summary.modified, 3);
        assert!(!summary.dry_run);
    }

    #[test]
    fn test_empty_summary_serializes_empty_map() {
        let json = serde_json::to_value(RunSummary::default()).unwrap();
        assert_eq!(json["skippedByCode"], serde_json::json!({}));
        assert_eq!(json["pagesProcessed"], 0);
    }
}
