//! Repository factory
//!
//! Builds the repository described by the configuration.

use crate::adapters::database::memory::InMemoryRepository;
use crate::adapters::database::traits::PoiRepository;
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::SyncConfig;
use crate::domain::{Result, SyncError};
use std::sync::Arc;

/// Create the repository for a run
///
/// With a `[postgresql]` section the PostgreSQL adapter is used (simulating
/// writes when `dry_run` is set). Without one, a dry run falls back to an
/// in-memory repository that stores nothing.
///
/// No connection is opened here; the PostgreSQL pool is created on first
/// write.
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] if PostgreSQL is not configured for
/// a real run, or its connection string is invalid.
pub fn create_repository(config: &SyncConfig) -> Result<Arc<dyn PoiRepository>> {
    let dry_run = config.application.dry_run;

    match &config.postgresql {
        Some(pg_config) => {
            tracing::info!(table = %pg_config.table, dry_run, "Creating PostgreSQL repository");
            let client = PostgreSQLClient::new(pg_config.clone())?;
            Ok(Arc::new(PostgreSQLAdapter::new(client, dry_run)))
        }
        None if dry_run => {
            tracing::info!("No PostgreSQL configured, dry run uses an in-memory repository");
            Ok(Arc::new(InMemoryRepository::dry_run()))
        }
        None => Err(SyncError::Configuration(
            "postgresql configuration is required unless dry_run is enabled".to_string(),
        )),
    }
}
