// POI Sync - Catalog to PostgreSQL importer
// Copyright (c) 2025 POI Sync Contributors
// Licensed under the MIT License

//! # POI Sync - Catalog to PostgreSQL importer
//!
//! POI Sync pulls points of interest from a paginated HTTP catalog, turns
//! each record into a canonical document keyed by its catalog ID, and
//! upserts the documents into PostgreSQL.
//!
//! ## Overview
//!
//! A run:
//! - **Fetches** pages of raw records with retries, backoff and `Retry-After`
//!   handling
//! - **Transforms** each record under a concurrency limit, skipping invalid
//!   records and counting them
//! - **Loads** each page with one idempotent upsert keyed by catalog ID
//! - **Reports** a run summary, or the partial summary when the run aborts
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Import pipeline, retry policy, concurrency limiter, transform
//! - [`adapters`] - External integrations (catalog HTTP API, PostgreSQL)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and run events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use poi_sync::adapters::catalog::HttpCatalogClient;
//! use poi_sync::adapters::database::create_repository;
//! use poi_sync::config::load_config;
//! use poi_sync::core::import::PaginationDriver;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("poi-sync.toml")?;
//!
//!     let client = HttpCatalogClient::new(&config.catalog)?;
//!     let repository = create_repository(&config)?;
//!     let driver = PaginationDriver::new(
//!         Arc::new(client),
//!         repository,
//!         config.import.to_import_config(),
//!     )?;
//!
//!     let summary = driver.run().await?;
//!     println!("Imported {} POIs", summary.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], whose error is
//! [`domain::SyncError`]. An aborted run returns
//! [`core::import::ImportFailure`], which carries the counters accumulated
//! before the abort alongside the error.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
