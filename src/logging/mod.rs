//! Logging and observability
//!
//! - [`structured`] - subscriber setup (JSON or pretty console, rolling file)
//! - [`events`] - typed run events (`import.completed`, `import.poi_skipped`,
//!   `http.retry`, `http.give_up`)
//!
//! # Example
//!
//! ```no_run
//! use poi_sync::logging::init_logging;
//! use poi_sync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod events;
pub mod structured;

pub use events::{HttpGiveUp, HttpRetry, ImportCompleted, PoiSkipped};
pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use poi_sync::log_error_with_context;
/// use poi_sync::domain::SyncError;
///
/// let error = SyncError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
