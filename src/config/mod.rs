//! Configuration management for POI Sync.
//!
//! Configuration comes from a TOML file with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `POI_SYNC_<SECTION>_<KEY>` environment overrides
//! - Default values for every optional setting
//! - Validation of every bound before a run starts
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use poi_sync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("poi-sync.toml")?;
//!
//! println!("Catalog: {}", config.catalog.base_url);
//! println!("Page size: {}", config.import.page_size);
//! if let Some(pg) = &config.postgresql {
//!     println!("Table: {}", pg.table);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! dry_run = false
//!
//! [catalog]
//! base_url = "https://api.openchargemap.io/v3"
//! api_key = "${POI_SYNC_API_KEY}"
//! timeout_ms = 8000
//!
//! [catalog.retry]
//! max_retries = 5
//! min_delay_ms = 250
//! max_delay_ms = 5000
//!
//! [import]
//! concurrency = 10
//! page_size = 100
//! max_pages = 1000
//!
//! [postgresql]
//! connection_string = "${POI_SYNC_DATABASE_URL}"
//! table = "pois"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_unvalidated, DEFAULT_CONFIG_PATH};
pub use schema::{
    ApplicationConfig, CatalogConfig, ImportSection, LoggingConfig, PostgreSQLConfig,
    RetryConfig, SyncConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
