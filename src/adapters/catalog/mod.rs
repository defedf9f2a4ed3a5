//! Remote catalog adapter
//!
//! [`CatalogClient`] is the seam between the importer and the catalog API.
//! [`HttpCatalogClient`] is the production implementation; tests substitute
//! scripted fakes.

pub mod client;
pub mod models;

pub use client::{catalog_retry_decision, parse_retry_after, sanitize_url, HttpCatalogClient};
pub use models::FetchPageParams;

use crate::domain::errors::CatalogError;
use crate::domain::record::RawRecord;
use async_trait::async_trait;

/// Source of paginated raw records
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches one page of records
    ///
    /// An empty vector means the catalog is exhausted. Implementations
    /// apply their own retry policy; an error returned here is final.
    async fn fetch_page(&self, params: &FetchPageParams) -> Result<Vec<RawRecord>, CatalogError>;
}
