//! Import pipeline
//!
//! - [`config`] - run settings and their bounds
//! - [`classify`] - skip-or-abort decisions for failures
//! - [`summary`] - run counters
//! - [`driver`] - the page loop

pub mod classify;
pub mod config;
pub mod driver;
pub mod summary;

pub use classify::{
    classify_transform_failure, wrap_repository_failure, RecordContext, TransformFailureDecision,
};
pub use config::ImportConfig;
pub use driver::{ImportFailure, PaginationDriver};
pub use summary::{RunSummary, RunSummaryTracker};
