//! External system integrations for POI Sync.
//!
//! - [`catalog`] - Remote catalog API client
//! - [`database`] - Repository abstraction, factory and in-memory store
//! - [`postgresql`] - PostgreSQL repository
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits
//! ([`catalog::CatalogClient`], [`database::PoiRepository`]) so the import
//! pipeline can be tested with in-memory implementations.
//!
//! ```rust,no_run
//! use poi_sync::adapters::catalog::{CatalogClient, FetchPageParams, HttpCatalogClient};
//! use poi_sync::adapters::database::{InMemoryRepository, PoiRepository};
//! use poi_sync::core::transform::PoiTransformer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpCatalogClient::new(&Default::default())?;
//! let repository = InMemoryRepository::new();
//!
//! let docs = client
//!     .fetch_page(&FetchPageParams::new(0, 10))
//!     .await?
//!     .into_iter()
//!     .filter_map(|raw| PoiTransformer::transform_record(raw).ok())
//!     .collect();
//! let result = repository.upsert_many(docs).await?;
//! println!("inserted {}", result.upserted);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod database;
pub mod postgresql;
