//! Domain models and types for POI Sync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ExternalId`], [`SurrogateId`])
//! - **Record models** ([`RawRecord`], [`CanonicalDoc`])
//! - **Error types** ([`SyncError`], [`CatalogError`], [`TransformError`], [`ImportFatalError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Catalog IDs are validated on construction, so a [`CanonicalDoc`] can never
//! carry a zero or out-of-range external ID:
//!
//! ```rust
//! use poi_sync::domain::ExternalId;
//! use std::str::FromStr;
//!
//! assert!(ExternalId::from_str("123").is_ok());
//! assert!(ExternalId::from_str("0").is_err());
//! assert!(ExternalId::from_str("1.5").is_err());
//! ```

pub mod errors;
pub mod ids;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{
    CatalogError, FatalCode, ImportErrorContext, ImportFatalError, InvalidRecordError, SkipCode,
    SyncError, TransformError,
};
pub use ids::{ExternalId, SurrogateId};
pub use record::{CanonicalDoc, RawRecord};
pub use result::Result;
