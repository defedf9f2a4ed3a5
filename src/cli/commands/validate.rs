//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the POI Sync configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::{load_config_unvalidated, SyncConfig};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config_unvalidated(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        match config.validate() {
            Ok(()) => {
                println!("✅ Configuration is valid");
                println!();
                print_config_summary(&config);
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_CONFIG_ERROR)
            }
        }
    }
}

fn print_config_summary(config: &SyncConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    println!("  Catalog: {}", config.catalog.base_url);
    println!(
        "  API Key: {}",
        if config.catalog.api_key.expose_secret().is_empty() {
            "(none)"
        } else {
            "***"
        }
    );
    println!("  Timeout: {}ms", config.catalog.timeout_ms);
    println!("  Max Retries: {}", config.catalog.retry.max_retries);
    println!("  Concurrency: {}", config.import.concurrency);
    println!("  Page Size: {}", config.import.page_size);
    println!("  Max Pages: {}", config.import.max_pages);
    println!("  Start Offset: {}", config.import.start_offset);
    if let Some(dataset) = &config.import.dataset {
        println!("  Dataset: {dataset}");
    }
    if let Some(modified_since) = &config.import.modified_since {
        println!("  Modified Since: {modified_since}");
    }

    match &config.postgresql {
        Some(pg_config) => {
            println!("  Database Target: PostgreSQL");
            println!(
                "  PostgreSQL Connection: {}",
                redact_connection_string(pg_config.connection_string.expose_secret().as_str())
            );
            println!("  Table: {}", pg_config.table);
            println!("  Max Connections: {}", pg_config.max_connections);
        }
        None => println!("  Database Target: none (dry run)"),
    }
    println!();
}

fn redact_connection_string(conn: &str) -> String {
    conn.rsplit_once('@')
        .map(|(_, host)| format!("***@{host}"))
        .unwrap_or_else(|| "***".to_string())
}
