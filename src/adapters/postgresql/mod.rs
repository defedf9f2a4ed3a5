//! PostgreSQL document store
//!
//! Stores each POI as one row keyed by its catalog ID, with the raw record
//! in a `JSONB` column.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use models::PostgreSQLPoi;
