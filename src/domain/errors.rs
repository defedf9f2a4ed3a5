//! Domain error types
//!
//! This module defines the error hierarchy for the importer. Errors are
//! domain-specific and don't expose third-party types: HTTP and database
//! failures are flattened into strings or status codes at the adapter edge.

use crate::domain::ids::ExternalId;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Main error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote catalog errors (after retries were exhausted or refused)
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// Fatal import errors that aborted a run
    #[error(transparent)]
    Import(#[from] ImportFatalError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Remote catalog errors
///
/// Produced by catalog clients. The retry policy inspects these to decide
/// whether an attempt is worth repeating. Response bodies are never captured.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Non-2xx response
    #[error("catalog request failed: {status}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Validated `Retry-After` hint (429 only)
        retry_after: Option<Duration>,
        /// Request URL without query string
        url: String,
    },

    /// A single attempt exceeded its timeout and was cancelled
    #[error("catalog request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64, url: String },

    /// Network failure without a status code
    #[error("failed to reach catalog: {0}")]
    Connection(String),

    /// The payload was not a JSON array
    #[error("invalid catalog response: {0}")]
    InvalidResponse(String),
}

impl CatalogError {
    /// Status code carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Sanitized URL carried by the error, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            CatalogError::Http { url, .. } | CatalogError::Timeout { url, .. } => Some(url),
            _ => None,
        }
    }
}

/// Record-level validation failure
///
/// Only the identity of a record is validated. A record that fails here is
/// skipped and counted; it never aborts a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRecordError {
    #[error("invalid record: missing ID")]
    MissingId,

    #[error("invalid record: ID is not numeric")]
    NonNumericId,

    #[error("invalid record: ID must be a positive integer")]
    IdNotPositiveInteger,
}

/// Failure raised while transforming one raw record
#[derive(Debug, Error)]
pub enum TransformError {
    /// The record is malformed; skip it
    #[error(transparent)]
    Invalid(#[from] InvalidRecordError),

    /// Anything else: a bug or an unexpected runtime failure
    #[error("{0:#}")]
    Unexpected(anyhow::Error),
}

/// Codes for records that are skipped without stopping the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipCode {
    InvalidRecord,
}

impl SkipCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipCode::InvalidRecord => "invalid_record",
        }
    }
}

impl fmt::Display for SkipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Codes for failures that abort the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FatalCode {
    TransformUnexpected,
    RepositoryWriteFailed,
}

impl FatalCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FatalCode::TransformUnexpected => "transform_unexpected",
            FatalCode::RepositoryWriteFailed => "repository_write_failed",
        }
    }
}

impl fmt::Display for FatalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in the run an import error happened
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportErrorContext {
    /// 1-based page number
    pub page: u64,

    /// Offset the page was fetched at
    pub offset: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    /// Position of the record within the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<ExternalId>,
}

impl ImportErrorContext {
    /// Creates a page-level context
    pub fn new(page: u64, offset: u64) -> Self {
        Self {
            page,
            offset,
            ..Default::default()
        }
    }

    /// Sets the page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets the record index
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Sets the external ID, when known
    pub fn with_external_id(mut self, external_id: Option<ExternalId>) -> Self {
        self.external_id = external_id;
        self
    }
}

/// Error that aborts an import run
///
/// Serializes to `{code, message, context}`. The original cause is kept for
/// `Error::source` chains but is never serialized, so cause payloads don't
/// leak into structured logs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFatalError {
    pub code: FatalCode,
    pub message: String,
    pub context: ImportErrorContext,
    #[serde(skip)]
    pub cause: Option<anyhow::Error>,
}

impl ImportFatalError {
    /// Creates a new fatal error
    pub fn new(
        code: FatalCode,
        message: impl Into<String>,
        context: ImportErrorContext,
        cause: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            context,
            cause,
        }
    }
}

impl fmt::Display for ImportFatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ImportFatalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|cause| {
            let source: &(dyn std::error::Error + 'static) = cause.as_ref();
            source
        })
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_sync_error_display() {
        let err = SyncError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_catalog_error_conversion() {
        let catalog_err = CatalogError::Connection("connection refused".to_string());
        let err: SyncError = catalog_err.into();
        assert!(matches!(err, SyncError::Catalog(_)));
    }

    #[test]
    fn test_catalog_error_status() {
        let err = CatalogError::Http {
            status: 429,
            retry_after: Some(Duration::from_secs(1)),
            url: "http://localhost/poi".to_string(),
        };
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.url(), Some("http://localhost/poi"));
        assert_eq!(err.to_string(), "catalog request failed: 429");

        let err = CatalogError::Connection("reset".to_string());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_invalid_record_messages() {
        assert_eq!(
            InvalidRecordError::MissingId.to_string(),
            "invalid record: missing ID"
        );
        assert_eq!(
            InvalidRecordError::NonNumericId.to_string(),
            "invalid record: ID is not numeric"
        );
        assert_eq!(
            InvalidRecordError::IdNotPositiveInteger.to_string(),
            "invalid record: ID must be a positive integer"
        );
    }

    #[test]
    fn test_codes_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_value(SkipCode::InvalidRecord).unwrap(),
            "invalid_record"
        );
        assert_eq!(
            serde_json::to_value(FatalCode::RepositoryWriteFailed).unwrap(),
            "repository_write_failed"
        );
        assert_eq!(FatalCode::TransformUnexpected.to_string(), "transform_unexpected");
    }

    #[test]
    fn test_fatal_error_keeps_cause_out_of_json() {
        let err = ImportFatalError::new(
            FatalCode::RepositoryWriteFailed,
            "Repository write failed at page=1, offset=0: boom",
            ImportErrorContext::new(1, 0),
            Some(anyhow::anyhow!("secret-cause-payload")),
        );

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("repository_write_failed"));
        assert!(json.contains("\"page\":1"));
        assert!(!json.contains("secret-cause-payload"));

        let source = err.source().expect("cause should be exposed as source");
        assert_eq!(source.to_string(), "secret-cause-payload");
    }

    #[test]
    fn test_context_omits_unknown_fields() {
        let ctx = ImportErrorContext::new(2, 10).with_page_size(10);
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["pageSize"], 10);
        assert!(json.get("index").is_none());
        assert!(json.get("externalId").is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: SyncError = io_err.into();
        assert!(matches!(err, SyncError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: SyncError = toml_err.into();
        assert!(matches!(err, SyncError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
