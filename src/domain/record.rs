//! Point-of-interest record models
//!
//! A [`RawRecord`] is whatever the catalog returned for one element of a page.
//! A [`CanonicalDoc`] is the validated, storable form produced by the
//! transform stage.

use crate::domain::ids::{ExternalId, SurrogateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One element of a catalog page, kept as the catalog sent it
///
/// Expected to be a JSON object. Only `ID` and `DateLastStatusUpdate` are
/// ever interpreted; everything else passes through untouched.
pub type RawRecord = serde_json::Value;

/// Field carrying the catalog's numeric identifier
pub const ID_FIELD: &str = "ID";

/// Field carrying the catalog's last status update timestamp
pub const LAST_UPDATED_FIELD: &str = "DateLastStatusUpdate";

/// Validated, storable point of interest
///
/// `raw` is stored verbatim and never mutated after the transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalDoc {
    /// Surrogate ID assigned locally
    pub id: SurrogateId,

    /// Catalog ID, the idempotency key
    pub external_id: ExternalId,

    /// Parsed `DateLastStatusUpdate`, when present and parseable
    pub last_updated: Option<DateTime<Utc>>,

    /// Full original payload
    pub raw: RawRecord,
}

impl CanonicalDoc {
    /// Creates a document with a freshly generated surrogate ID
    pub fn new(
        external_id: ExternalId,
        last_updated: Option<DateTime<Utc>>,
        raw: RawRecord,
    ) -> Self {
        Self {
            id: SurrogateId::generate(),
            external_id,
            last_updated,
            raw,
        }
    }
}
