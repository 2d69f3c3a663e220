//! Catalog records, column metadata, and the store abstraction.
//!
//! The store is an explicit collaborator passed where it is needed; there
//! is no process-wide connection.

mod column;
mod record;
mod sqlite;
mod store;

pub use column::Column;
pub use record::{ExoplanetRecord, SearchHit};
pub use sqlite::SqliteCatalog;
pub use store::{CatalogStore, SearchFilter};
