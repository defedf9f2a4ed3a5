//! Importer configuration
//!
//! [`ImportConfig`] is resolved once per run and is immutable afterwards.
//! Every bound is checked before the first fetch.

use crate::core::transform::parse_timestamp;
use crate::domain::{Result, SyncError};

/// Maximum transform concurrency
pub const MAX_CONCURRENCY: usize = 50;

/// Maximum page size requested from the catalog
pub const MAX_PAGE_SIZE: u32 = 500;

/// Maximum number of pages processed in one run
pub const MAX_PAGES: u32 = 100_000;

/// Settings for one import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Record transforms in flight at once (1-50)
    pub concurrency: usize,

    /// Records requested per page (1-500)
    pub page_size: u32,

    /// Hard cap on pages processed (1-100000)
    pub max_pages: u32,

    /// Offset of the first fetch
    pub start_offset: u64,

    /// Optional dataset filter passed to the catalog
    pub dataset: Option<String>,

    /// Optional lower bound on modification time, passed to the catalog as-is
    pub modified_since: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            page_size: 100,
            max_pages: 1000,
            start_offset: 0,
            dataset: None,
            modified_since: None,
        }
    }
}

impl ImportConfig {
    /// Normalizes optional filters and validates every bound
    ///
    /// Blank `dataset` and `modified_since` values are treated as unset.
    pub fn resolve(mut self) -> Result<Self> {
        self.dataset = non_blank(self.dataset);
        self.modified_since = non_blank(self.modified_since);
        self.validate()?;
        Ok(self)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_CONCURRENCY).contains(&self.concurrency) {
            return Err(SyncError::Configuration(format!(
                "concurrency must be between 1 and {MAX_CONCURRENCY}, got {}",
                self.concurrency
            )));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(SyncError::Configuration(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }

        if !(1..=MAX_PAGES).contains(&self.max_pages) {
            return Err(SyncError::Configuration(format!(
                "max_pages must be between 1 and {MAX_PAGES}, got {}",
                self.max_pages
            )));
        }

        if let Some(modified_since) = &self.modified_since {
            if parse_timestamp(modified_since).is_none() {
                return Err(SyncError::Configuration(format!(
                    "modified_since must be a timestamp, got '{modified_since}'"
                )));
            }
        }

        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_defaults_are_valid() {
        let config = ImportConfig::default().resolve().unwrap();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_pages, 1000);
        assert_eq!(config.start_offset, 0);
    }

    #[test_case(0, 100, 10 ; "zero concurrency")]
    #[test_case(51, 100, 10 ; "concurrency above cap")]
    #[test_case(5, 0, 10 ; "zero page size")]
    #[test_case(5, 501, 10 ; "page size above cap")]
    #[test_case(5, 100, 0 ; "zero max pages")]
    #[test_case(5, 100, 100_001 ; "max pages above cap")]
    fn test_out_of_range_is_rejected(concurrency: usize, page_size: u32, max_pages: u32) {
        let config = ImportConfig {
            concurrency,
            page_size,
            max_pages,
            ..Default::default()
        };
        assert!(matches!(config.resolve(), Err(SyncError::Configuration(_))));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let config = ImportConfig {
            concurrency: 50,
            page_size: 500,
            max_pages: 100_000,
            start_offset: u64::MAX,
            ..Default::default()
        };
        assert!(config.resolve().is_ok());
    }

    #[test]
    fn test_blank_filters_become_unset() {
        let config = ImportConfig {
            dataset: Some("  ".to_string()),
            modified_since: Some(String::new()),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert!(config.dataset.is_none());
        assert!(config.modified_since.is_none());
    }

    #[test]
    fn test_modified_since_must_parse() {
        let ok = ImportConfig {
            modified_since: Some("2024-01-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        assert!(ok.resolve().is_ok());

        let bad = ImportConfig {
            modified_since: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert!(bad.resolve().is_err());
    }
}
