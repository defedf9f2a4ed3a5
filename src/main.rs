// POI Sync - Catalog to PostgreSQL importer
// Copyright (c) 2025 POI Sync Contributors
// Licensed under the MIT License

use clap::Parser;
use poi_sync::cli::{Cli, Commands, EXIT_CONFIG_ERROR, EXIT_FATAL_ERROR};
use poi_sync::config::load_config_unvalidated;
use poi_sync::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging settings come from the config file when it can be read; the
    // command reports any config error itself once logging is up.
    let file_config = load_config_unvalidated(&cli.config).ok();
    let logging_config = file_config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| file_config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_CONFIG_ERROR);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "POI Sync - Catalog to PostgreSQL importer"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL_ERROR
        }
    };

    // Flush the file writer before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Import(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
