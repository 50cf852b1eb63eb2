//! Database Layer
//!
//! Connection management, the storage abstraction trait, and its libsql
//! implementation. Service-layer code depends on `CatalogStore` only; the
//! libsql specifics stay behind `TursoStore`.

mod catalog_store;
mod database;
mod error;
mod turso_store;

pub use catalog_store::{CatalogStore, EntityRow};
pub use database::DatabaseService;
pub use error::DatabaseError;
pub use turso_store::TursoStore;
