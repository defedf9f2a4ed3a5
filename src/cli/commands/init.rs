//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_FATAL_ERROR, EXIT_SUCCESS};
use crate::config::DEFAULT_CONFIG_PATH;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing POI Sync configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        match fs::write(&self.output, starter_config()) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set POI_SYNC_API_KEY");
                println!("     - Set POI_SYNC_DATABASE_URL");
                println!("  3. Validate configuration: poi-sync validate-config");
                println!("  4. Try a dry run: poi-sync import --dry-run --max-pages 1");
                println!("  5. Run the import: poi-sync import");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL_ERROR)
            }
        }
    }
}

/// Starter configuration with every option and its default
pub fn starter_config() -> &'static str {
    r#"# POI Sync Configuration File
# Imports points of interest from a paginated catalog into PostgreSQL

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Fetch and transform without writing to PostgreSQL
dry_run = false

[catalog]
# Catalog base URL; records are fetched from <base_url>/poi
base_url = "https://api.openchargemap.io/v3"

# Sent as X-API-Key when non-empty
api_key = "${POI_SYNC_API_KEY}"

# Per-attempt timeout (1000-30000)
timeout_ms = 8000

[catalog.retry]
# Retries after the first attempt (0-10)
max_retries = 5
min_delay_ms = 250
max_delay_ms = 5000
# Fraction of each delay added as random jitter (0.0-1.0)
jitter_ratio = 0.2

[import]
# Record transforms in flight at once (1-50)
concurrency = 10

# Records requested per page (1-500)
page_size = 100

# Hard cap on pages processed per run (1-100000)
max_pages = 1000

# Offset of the first fetch
start_offset = 0

# Optional filters passed to the catalog
# dataset = "EU"
# modified_since = "2024-01-01T00:00:00Z"

[postgresql]
connection_string = "${POI_SYNC_DATABASE_URL}"
max_connections = 10
connection_timeout_seconds = 30
statement_timeout_seconds = 60
table = "pois"

[logging]
# json or pretty
format = "json"
local_enabled = false
local_path = "./logs"
# daily, hourly or never
local_rotation = "daily"
"#
}
