//! PostgreSQL repository

use crate::adapters::database::traits::{dedupe_by_external_id, PoiRepository, UpsertResult};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::domain::record::CanonicalDoc;
use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// [`PoiRepository`] backed by PostgreSQL
///
/// In dry-run mode nothing is written and no connection is opened.
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
    dry_run: bool,
}

impl PostgreSQLAdapter {
    pub fn new(client: PostgreSQLClient, dry_run: bool) -> Self {
        Self {
            client: Arc::new(client),
            dry_run,
        }
    }

    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

#[async_trait]
impl PoiRepository for PostgreSQLAdapter {
    async fn upsert_many(&self, docs: Vec<CanonicalDoc>) -> Result<UpsertResult> {
        if docs.is_empty() {
            return Ok(UpsertResult::default());
        }

        let submitted = docs.len();
        let docs = dedupe_by_external_id(docs);

        if self.dry_run {
            tracing::info!(
                count = docs.len(),
                duplicates = submitted - docs.len(),
                table = %self.client.table(),
                "DRY RUN: Would upsert {} documents into PostgreSQL",
                docs.len()
            );
            return Ok(UpsertResult::default());
        }

        let result = self.client.upsert_documents(&docs).await?;
        tracing::debug!(
            count = docs.len(),
            upserted = result.upserted,
            modified = result.modified,
            "Upserted batch"
        );
        Ok(result)
    }

    async fn close(&self) -> Result<()> {
        self.client.close().await;
        Ok(())
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{secret_string, PostgreSQLConfig};
    use crate::domain::ExternalId;
    use serde_json::json;

    fn adapter(dry_run: bool) -> PostgreSQLAdapter {
        let config = PostgreSQLConfig::new(secret_string(
            "postgresql://user:pw@127.0.0.1:1/pois".to_string(),
        ));
        PostgreSQLAdapter::new(PostgreSQLClient::new(config).unwrap(), dry_run)
    }

    #[tokio::test]
    async fn test_empty_batch_needs_no_connection() {
        let adapter = adapter(false);
        let result = adapter.upsert_many(Vec::new()).await.unwrap();
        assert_eq!(result, UpsertResult::default());
        assert!(!adapter.client().is_connected().await);
    }

    #[tokio::test]
    async fn test_dry_run_reports_zero_without_connecting() {
        let adapter = adapter(true);
        let docs = vec![CanonicalDoc::new(
            ExternalId::new(1).unwrap(),
            None,
            json!({"ID": 1}),
        )];

        let result = adapter.upsert_many(docs).await.unwrap();
        assert_eq!(result, UpsertResult::default());
        assert!(adapter.is_dry_run());
        assert!(!adapter.client().is_connected().await);

        adapter.close().await.unwrap();
        adapter.close().await.unwrap();
    }
}
