//! Core business logic for POI Sync.
//!
//! # Modules
//!
//! - [`import`] - Pagination driver, failure classification and run summary
//! - [`transform`] - Raw record to canonical document conversion
//! - [`retry`] - Bounded retry with exponential backoff and jitter
//! - [`concurrency`] - Bounded-concurrency task runner
//!
//! # Import Workflow
//!
//! 1. **Fetch**: Request one page from the catalog (retried on transient failures)
//! 2. **Transform**: Convert each record, at most `concurrency` at a time
//! 3. **Classify**: Skip invalid records, abort on anything unexpected
//! 4. **Upsert**: Write the page's valid documents keyed by external ID
//! 5. **Advance**: Move the offset by the raw page length and repeat
//!
//! # Example
//!
//! ```rust,no_run
//! use poi_sync::adapters::catalog::HttpCatalogClient;
//! use poi_sync::adapters::database::InMemoryRepository;
//! use poi_sync::config::CatalogConfig;
//! use poi_sync::core::import::{ImportConfig, PaginationDriver};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(HttpCatalogClient::new(&CatalogConfig::default())?);
//! let repository = Arc::new(InMemoryRepository::new());
//!
//! let driver = PaginationDriver::new(client, repository, ImportConfig::default())?;
//! let summary = driver.run().await?;
//!
//! println!("Imported: {}", summary.total);
//! println!("Skipped: {}", summary.skipped_invalid());
//! # Ok(())
//! # }
//! ```

pub mod concurrency;
pub mod import;
pub mod retry;
pub mod transform;
