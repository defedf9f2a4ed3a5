//! Repository abstraction layer
//!
//! The importer writes through [`PoiRepository`]; [`create_repository`]
//! picks the implementation from configuration.

pub mod factory;
pub mod memory;
pub mod traits;

pub use factory::create_repository;
pub use memory::InMemoryRepository;
pub use traits::{dedupe_by_external_id, PoiRepository, UpsertResult};
