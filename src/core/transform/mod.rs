//! Record transformation
//!
//! Converts raw catalog records into [`CanonicalDoc`]s. Only the identity
//! (`ID`) is validated strictly; the `DateLastStatusUpdate` timestamp is
//! parsed leniently and dropped when it can't be read.
//!
//! Transformers are async so the pipeline can host transforms that do I/O,
//! even though the default [`PoiTransformer`] is pure.

use crate::domain::errors::{InvalidRecordError, TransformError};
use crate::domain::ids::ExternalId;
use crate::domain::record::{CanonicalDoc, RawRecord, ID_FIELD, LAST_UPDATED_FIELD};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;

/// Converts one raw record into a canonical document
#[async_trait]
pub trait RecordTransformer: Send + Sync {
    /// Transforms a record
    ///
    /// Returns [`TransformError::Invalid`] for records that should be skipped
    /// and [`TransformError::Unexpected`] for anything that should abort.
    async fn transform(&self, raw: RawRecord) -> Result<CanonicalDoc, TransformError>;
}

/// Default transformer for catalog POIs
#[derive(Debug, Clone, Copy, Default)]
pub struct PoiTransformer;

impl PoiTransformer {
    /// Synchronous transform used by the trait implementation
    ///
    /// # Examples
    ///
    /// ```
    /// use poi_sync::core::transform::PoiTransformer;
    /// use serde_json::json;
    ///
    /// let doc = PoiTransformer::transform_record(json!({"ID": "42"})).unwrap();
    /// assert_eq!(doc.external_id.get(), 42);
    /// assert!(doc.last_updated.is_none());
    /// ```
    pub fn transform_record(raw: RawRecord) -> Result<CanonicalDoc, InvalidRecordError> {
        let external_id = parse_external_id(raw.get(ID_FIELD))?;
        let last_updated = parse_last_updated(raw.get(LAST_UPDATED_FIELD));
        Ok(CanonicalDoc::new(external_id, last_updated, raw))
    }
}

#[async_trait]
impl RecordTransformer for PoiTransformer {
    async fn transform(&self, raw: RawRecord) -> Result<CanonicalDoc, TransformError> {
        Ok(Self::transform_record(raw)?)
    }
}

/// Extracts the external ID from the value of the `ID` field
///
/// Accepts an integer (or an integral float) or a numeric string.
pub fn parse_external_id(value: Option<&Value>) -> Result<ExternalId, InvalidRecordError> {
    match value {
        None | Some(Value::Null) => Err(InvalidRecordError::MissingId),
        Some(Value::Number(number)) => {
            if let Some(n) = number.as_u64() {
                return ExternalId::new(n);
            }
            if number.is_i64() {
                return Err(InvalidRecordError::IdNotPositiveInteger);
            }
            number
                .as_f64()
                .map_or(Err(InvalidRecordError::IdNotPositiveInteger), external_id_from_f64)
        }
        Some(Value::String(s)) => match ExternalId::from_str(s) {
            // Numeric but not plain digits, e.g. "1.5" or "-3"
            Err(InvalidRecordError::NonNumericId) => parse_decimal(s.trim())
                .map_or(Err(InvalidRecordError::NonNumericId), external_id_from_f64),
            other => other,
        },
        Some(_) => Err(InvalidRecordError::NonNumericId),
    }
}

fn external_id_from_f64(value: f64) -> Result<ExternalId, InvalidRecordError> {
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > ExternalId::MAX as f64 {
        return Err(InvalidRecordError::IdNotPositiveInteger);
    }
    ExternalId::new(value as u64)
}

fn parse_decimal(s: &str) -> Option<f64> {
    let looks_numeric = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if !looks_numeric {
        return None;
    }
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Parses the last-updated timestamp, returning `None` on anything unreadable
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as UTC) and a
/// plain `YYYY-MM-DD`. Parse failures are swallowed and not counted.
pub fn parse_last_updated(value: Option<&Value>) -> Option<DateTime<Utc>> {
    parse_timestamp(value?.as_str()?)
}

/// Parses a timestamp string in any of the accepted formats
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Runs a transform, turning a panic into [`TransformError::Unexpected`]
pub async fn transform_guarded<T>(transformer: &T, raw: RawRecord) -> Result<CanonicalDoc, TransformError>
where
    T: RecordTransformer + ?Sized,
{
    match AssertUnwindSafe(transformer.transform(raw)).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(TransformError::Unexpected(anyhow::anyhow!(
            "transform panicked: {}",
            panic_message(payload.as_ref())
        ))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
