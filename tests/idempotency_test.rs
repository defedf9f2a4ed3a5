//! Integration tests for idempotent upserts
//!
//! The PostgreSQL tests run only when `POI_SYNC_TEST_DATABASE_URL` points at
//! a disposable database; otherwise they return early.

mod common;

use common::ScriptedCatalog;
use poi_sync::adapters::database::{InMemoryRepository, PoiRepository};
use poi_sync::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
use poi_sync::config::{secret_string, PostgreSQLConfig};
use poi_sync::core::import::{ImportConfig, PaginationDriver};
use poi_sync::domain::{CanonicalDoc, ExternalId};
use serde_json::json;
use std::sync::Arc;

fn doc(id: u64, title: &str) -> CanonicalDoc {
    CanonicalDoc::new(
        ExternalId::new(id).unwrap(),
        None,
        json!({ "ID": id, "Title": title }),
    )
}

#[tokio::test]
async fn test_surrogate_id_survives_reimport() {
    let repository = InMemoryRepository::new();

    let first = doc(1, "before");
    let original_id = first.id;
    repository.upsert_many(vec![first]).await.unwrap();

    let second = doc(1, "after");
    assert_ne!(second.id, original_id);
    let result = repository.upsert_many(vec![second]).await.unwrap();

    assert_eq!(result.upserted, 0);
    assert_eq!(result.modified, 1);

    let stored = repository.get(ExternalId::new(1).unwrap()).unwrap();
    assert_eq!(stored.id, original_id);
    assert_eq!(stored.raw["Title"], "after");
}

#[tokio::test]
async fn test_reimport_leaves_one_document_per_id() {
    let repository = Arc::new(InMemoryRepository::new());
    let config = ImportConfig {
        page_size: 7,
        ..Default::default()
    };

    for _ in 0..3 {
        PaginationDriver::new(
            Arc::new(ScriptedCatalog::with_total(20)),
            repository.clone(),
            config.clone(),
        )
        .unwrap()
        .run()
        .await
        .unwrap();
    }

    assert_eq!(repository.len(), 20);
    let stored: Vec<u64> = repository
        .documents()
        .iter()
        .map(|d| d.external_id.get())
        .collect();
    assert_eq!(stored, (1..=20).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_empty_batch_is_a_no_op() {
    let repository = InMemoryRepository::new();
    let result = repository.upsert_many(Vec::new()).await.unwrap();

    assert_eq!(result.upserted, 0);
    assert_eq!(result.modified, 0);
    assert!(repository.batches().is_empty());
}

fn test_database_url() -> Option<String> {
    std::env::var("POI_SYNC_TEST_DATABASE_URL")
        .ok()
        .filter(|url| !url.is_empty())
}

fn postgres_adapter(url: String, table: &str) -> PostgreSQLAdapter {
    let config = PostgreSQLConfig {
        table: table.to_string(),
        ..PostgreSQLConfig::new(secret_string(url))
    };
    PostgreSQLAdapter::new(PostgreSQLClient::new(config).unwrap(), false)
}

#[tokio::test]
async fn test_postgres_upsert_is_idempotent() {
    let Some(url) = test_database_url() else {
        return;
    };
    let table = format!("pois_test_{}", uuid::Uuid::new_v4().simple());
    let adapter = postgres_adapter(url, &table);

    let first = adapter
        .upsert_many(vec![doc(1, "a"), doc(2, "b")])
        .await
        .unwrap();
    assert_eq!(first.upserted, 2);
    assert_eq!(first.modified, 0);

    let second = adapter
        .upsert_many(vec![doc(2, "b2"), doc(3, "c"), doc(3, "c2")])
        .await
        .unwrap();
    assert_eq!(second.upserted, 1);
    assert_eq!(second.modified, 1);

    adapter.close().await.unwrap();
    // Closing twice is allowed
    adapter.close().await.unwrap();
}

#[tokio::test]
async fn test_postgres_dry_run_never_connects() {
    // Unreachable host: a dry run must not try to open the pool
    let config = PostgreSQLConfig::new(secret_string(
        "postgresql://user:pw@127.0.0.1:1/unreachable".to_string(),
    ));
    let adapter = PostgreSQLAdapter::new(PostgreSQLClient::new(config).unwrap(), true);

    let result = adapter.upsert_many(vec![doc(1, "a")]).await.unwrap();

    assert_eq!(result.upserted, 0);
    assert_eq!(result.modified, 0);
    assert!(adapter.is_dry_run());
    assert!(!adapter.client().is_connected().await);
    adapter.close().await.unwrap();
}
