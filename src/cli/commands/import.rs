//! Import command implementation
//!
//! Pulls POIs page by page from the catalog and upserts them into the
//! configured store.

use crate::adapters::catalog::HttpCatalogClient;
use crate::adapters::database::create_repository;
use crate::cli::{EXIT_CONFIG_ERROR, EXIT_CONNECTION_ERROR, EXIT_FATAL_ERROR, EXIT_SUCCESS};
use crate::config::{load_config_unvalidated, SyncConfig};
use crate::core::import::{PaginationDriver, RunSummary};
use crate::log_error_with_context;
use clap::Args;
use std::sync::Arc;

/// Arguments for the import command
#[derive(Args, Debug, Default)]
pub struct ImportArgs {
    /// Dry run mode - fetch and transform without writing to PostgreSQL
    #[arg(long)]
    pub dry_run: bool,

    /// Override record transform concurrency (1-50)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Override records requested per page (1-500)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Override the maximum number of pages processed
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Override the offset of the first fetch
    #[arg(long)]
    pub start_offset: Option<u64>,

    /// Only import records from this dataset
    #[arg(long)]
    pub dataset: Option<String>,

    /// Only import records modified since this timestamp
    #[arg(long, value_name = "TIMESTAMP")]
    pub modified_since: Option<String>,
}

impl ImportArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut SyncConfig) {
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Some(concurrency) = self.concurrency {
            tracing::info!(concurrency, "Overriding concurrency from CLI");
            config.import.concurrency = concurrency;
        }

        if let Some(page_size) = self.page_size {
            tracing::info!(page_size, "Overriding page size from CLI");
            config.import.page_size = page_size;
        }

        if let Some(max_pages) = self.max_pages {
            tracing::info!(max_pages, "Overriding max pages from CLI");
            config.import.max_pages = max_pages;
        }

        if let Some(start_offset) = self.start_offset {
            tracing::info!(start_offset, "Overriding start offset from CLI");
            config.import.start_offset = start_offset;
        }

        if let Some(dataset) = &self.dataset {
            tracing::info!(dataset = %dataset, "Overriding dataset from CLI");
            config.import.dataset = Some(dataset.clone());
        }

        if let Some(modified_since) = &self.modified_since {
            tracing::info!(modified_since = %modified_since, "Overriding modified_since from CLI");
            config.import.modified_since = Some(modified_since.clone());
        }
    }

    /// Execute the import command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting import command");

        let mut config = match load_config_unvalidated(config_path) {
            Ok(config) => config,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            println!("🔍 DRY RUN MODE - No data will be written to the database");
            println!();
        }

        let client = match HttpCatalogClient::new(&config.catalog) {
            Ok(client) => client,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create catalog client");
                eprintln!("Failed to create catalog client: {e}");
                return Ok(EXIT_CONNECTION_ERROR);
            }
        };

        let repository = match create_repository(&config) {
            Ok(repository) => repository,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create repository");
                eprintln!("Failed to create repository: {e}");
                return Ok(EXIT_CONNECTION_ERROR);
            }
        };

        let driver = match PaginationDriver::new(
            Arc::new(client),
            Arc::clone(&repository),
            config.import.to_import_config(),
        ) {
            Ok(driver) => driver,
            Err(e) => {
                if let Err(close_err) = repository.close().await {
                    tracing::warn!(error = %close_err, "Failed to close repository");
                }
                log_error_with_context!(&e, "Invalid import settings");
                eprintln!("Invalid import settings: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        match driver.run().await {
            Ok(summary) => {
                print_summary(&summary);
                Ok(EXIT_SUCCESS)
            }
            Err(failure) => {
                log_error_with_context!(&failure.error, "Import failed");
                eprintln!("Import failed: {}", failure.error);
                println!("Partial results before the failure:");
                print_summary(&failure.summary);
                Ok(EXIT_FATAL_ERROR)
            }
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Import Summary");
    println!("==============");
    println!("Pages processed:  {}", summary.pages_processed);
    println!("Documents:        {}", summary.total);
    println!("Inserted:         {}", summary.upserted);
    println!("Updated:          {}", summary.modified);
    println!("Skipped invalid:  {}", summary.skipped_invalid());
    println!("Duration:         {:.2}s", summary.duration.as_secs_f64());
    if summary.dry_run {
        println!("Mode:             dry run");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;

    #[test]
    fn test_apply_overrides() {
        let mut config = parse_config("").unwrap();
        let args = ImportArgs {
            dry_run: true,
            concurrency: Some(4),
            page_size: Some(25),
            max_pages: Some(2),
            start_offset: Some(50),
            dataset: Some("EU".to_string()),
            modified_since: Some("2024-01-01T00:00:00Z".to_string()),
        };

        args.apply_overrides(&mut config);

        assert!(config.application.dry_run);
        assert_eq!(config.import.concurrency, 4);
        assert_eq!(config.import.page_size, 25);
        assert_eq!(config.import.max_pages, 2);
        assert_eq!(config.import.start_offset, 50);
        assert_eq!(config.import.dataset.as_deref(), Some("EU"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = parse_config("[import]\npage_size = 40\n").unwrap();
        ImportArgs::default().apply_overrides(&mut config);

        assert!(!config.application.dry_run);
        assert_eq!(config.import.page_size, 40);
    }

    #[tokio::test]
    async fn test_missing_config_file_is_config_error() {
        let code = ImportArgs::default()
            .execute("/nonexistent/poi-sync.toml")
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }

    #[tokio::test]
    async fn test_out_of_range_override_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poi-sync.toml");
        std::fs::write(&path, "[application]\ndry_run = true\n").unwrap();

        let args = ImportArgs {
            page_size: Some(501),
            ..Default::default()
        };
        let code = args.execute(path.to_str().unwrap()).await.unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }
}
