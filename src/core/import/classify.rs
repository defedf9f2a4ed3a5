//! Failure classification
//!
//! Decides whether a failure skips one record or aborts the run. Both
//! functions are pure: they build a decision and never log or panic.

use crate::domain::errors::{
    FatalCode, ImportErrorContext, ImportFatalError, SkipCode, SyncError, TransformError,
};
use crate::domain::ids::ExternalId;
use crate::logging::events::PoiSkipped;

/// Position of one record within the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordContext {
    pub page: u64,
    pub offset: u64,
    pub page_size: u32,
    pub index: usize,
    pub external_id: Option<ExternalId>,
}

impl From<RecordContext> for ImportErrorContext {
    fn from(ctx: RecordContext) -> Self {
        ImportErrorContext::new(ctx.page, ctx.offset)
            .with_page_size(ctx.page_size)
            .with_index(ctx.index)
            .with_external_id(ctx.external_id)
    }
}

/// Outcome of classifying a transform failure
#[derive(Debug)]
pub enum TransformFailureDecision {
    /// Count the record, log it, keep going
    Skip { code: SkipCode, log: PoiSkipped },

    /// Abort the run
    Fail(ImportFatalError),
}

/// Classifies a transform failure
///
/// Validation failures become [`TransformFailureDecision::Skip`]; anything
/// else becomes a `transform_unexpected` fatal error carrying the cause.
pub fn classify_transform_failure(
    error: TransformError,
    ctx: RecordContext,
) -> TransformFailureDecision {
    match error {
        TransformError::Invalid(invalid) => {
            let code = SkipCode::InvalidRecord;
            TransformFailureDecision::Skip {
                code,
                log: PoiSkipped::new(
                    code,
                    invalid.to_string(),
                    ctx.page,
                    ctx.offset,
                    ctx.page_size,
                    ctx.external_id,
                ),
            }
        }
        TransformError::Unexpected(cause) => {
            let message = format!(
                "Unexpected transform failure at page={}, offset={}, index={}: {cause:#}",
                ctx.page, ctx.offset, ctx.index
            );
            TransformFailureDecision::Fail(ImportFatalError::new(
                FatalCode::TransformUnexpected,
                message,
                ctx.into(),
                Some(cause),
            ))
        }
    }
}

/// Wraps a repository write failure as a `repository_write_failed` fatal error
pub fn wrap_repository_failure(
    error: SyncError,
    page: u64,
    offset: u64,
    page_size: u32,
) -> ImportFatalError {
    let message = format!("Repository write failed at page={page}, offset={offset}: {error}");
    ImportFatalError::new(
        FatalCode::RepositoryWriteFailed,
        message,
        ImportErrorContext::new(page, offset).with_page_size(page_size),
        Some(anyhow::Error::new(error)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::InvalidRecordError;
    use std::error::Error as _;

    fn ctx(external_id: Option<u64>) -> RecordContext {
        RecordContext {
            page: 3,
            offset: 20,
            page_size: 10,
            index: 4,
            external_id: external_id.map(|id| ExternalId::new(id).unwrap()),
        }
    }

    #[test]
    fn test_validation_failure_is_skipped() {
        let decision =
            classify_transform_failure(InvalidRecordError::MissingId.into(), ctx(None));

        match decision {
            TransformFailureDecision::Skip { code, log } => {
                assert_eq!(code, SkipCode::InvalidRecord);
                assert_eq!(log.event, "import.poi_skipped");
                assert_eq!(log.reason, "invalid record: missing ID");
                assert_eq!(log.page, 3);
                assert_eq!(log.offset, 20);
                assert_eq!(log.page_size, 10);
                assert!(log.external_id.is_none());
            }
            TransformFailureDecision::Fail(err) => panic!("unexpected fatal: {err}"),
        }
    }

    #[test]
    fn test_unexpected_failure_is_fatal_with_context() {
        let error = TransformError::Unexpected(anyhow::anyhow!("index out of bounds"));
        let decision = classify_transform_failure(error, ctx(Some(99)));

        match decision {
            TransformFailureDecision::Fail(err) => {
                assert_eq!(err.code, FatalCode::TransformUnexpected);
                assert_eq!(
                    err.message,
                    "Unexpected transform failure at page=3, offset=20, index=4: index out of bounds"
                );
                assert_eq!(err.context.index, Some(4));
                assert_eq!(err.context.page_size, Some(10));
                assert_eq!(err.context.external_id, Some(ExternalId::new(99).unwrap()));
                assert!(err.source().is_some());
            }
            TransformFailureDecision::Skip { .. } => panic!("expected fatal"),
        }
    }

    #[test]
    fn test_repository_failure_wrapping() {
        let err = wrap_repository_failure(
            SyncError::Database("connection reset".to_string()),
            2,
            10,
            10,
        );

        assert_eq!(err.code, FatalCode::RepositoryWriteFailed);
        assert_eq!(
            err.message,
            "Repository write failed at page=2, offset=10: Database error: connection reset"
        );
        assert_eq!(err.context.page, 2);
        assert_eq!(err.context.offset, 10);
        assert!(err.context.index.is_none());

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "repository_write_failed");
        assert!(json.get("cause").is_none());
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("Database error: connection reset".to_string())
        );
    }
}
