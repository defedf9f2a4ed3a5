//! PostgreSQL row models and SQL
//!
//! Every POI is one row of the configured table, keyed by `external_id`.

use crate::domain::record::CanonicalDoc;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Row written for one document
#[derive(Debug, Clone, PartialEq)]
pub struct PostgreSQLPoi {
    /// Surrogate key, kept from the first insert
    pub id: Uuid,

    /// Catalog ID (`BIGINT`)
    pub external_id: i64,

    /// Last status update reported by the catalog
    pub last_updated: Option<DateTime<Utc>>,

    /// Record as fetched (`JSONB`)
    pub raw: Value,
}

impl PostgreSQLPoi {
    pub fn from_doc(doc: &CanonicalDoc) -> Self {
        Self {
            id: *doc.id.as_uuid(),
            external_id: doc.external_id.as_i64(),
            last_updated: doc.last_updated,
            raw: doc.raw.clone(),
        }
    }
}

/// Idempotent schema bootstrap for `table`
///
/// `table` must already be a validated SQL identifier.
pub fn schema_sql(table: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {table} (
    id UUID PRIMARY KEY,
    external_id BIGINT NOT NULL UNIQUE,
    last_updated TIMESTAMPTZ NULL,
    raw JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS {table}_last_updated_idx ON {table} (last_updated);
"#
    )
}

/// Upsert keyed by `external_id`
///
/// The surrogate `id` is written on insert only. `inserted` is true for a
/// new row and false when an existing row was overwritten.
pub fn upsert_sql(table: &str) -> String {
    format!(
        r#"
INSERT INTO {table} (id, external_id, last_updated, raw)
VALUES ($1, $2, $3, $4)
ON CONFLICT (external_id) DO UPDATE SET
    last_updated = EXCLUDED.last_updated,
    raw = EXCLUDED.raw,
    updated_at = now()
RETURNING (xmax = 0) AS inserted
"#
    )
}
