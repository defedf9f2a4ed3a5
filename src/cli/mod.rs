//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// Run finished successfully
pub const EXIT_SUCCESS: i32 = 0;

/// Configuration could not be loaded or is invalid
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// A client or repository could not be initialized
pub const EXIT_CONNECTION_ERROR: i32 = 4;

/// The import aborted
pub const EXIT_FATAL_ERROR: i32 = 5;

/// POI Sync - catalog to PostgreSQL importer
#[derive(Parser, Debug)]
#[command(name = "poi-sync")]
#[command(version, about, long_about = None)]
#[command(author = "POI Sync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "poi-sync.toml", env = "POI_SYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "POI_SYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import POIs from the catalog into the configured store
    Import(commands::import::ImportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
