//! Glossarium Core
//!
//! A typed, hierarchical entity-relationship engine over an embedded
//! relational substrate (libsql). Entities of any kind live in one table as
//! serialized bodies; typed edges relate them; fully-qualified names give
//! every entity a stable dotted path that doubles as a lookup and bulk-rename
//! key.
//!
//! The first-class domain built on the engine is a business glossary:
//! glossaries contain trees of terms, terms cross-reference each other, users
//! review them, and classification tags attach by name.
//!
//! # Architecture
//!
//! - [`models`] - value types: references, terms, glossaries, change records
//! - [`db`] - connection management, the `CatalogStore` trait, and its libsql
//!   implementation
//! - [`services`] - the lifecycle controller, FQN engine, and diff engine
//!
//! # Examples
//!
//! ```no_run
//! use glossarium_core::db::{DatabaseService, TursoStore};
//! use glossarium_core::models::{Glossary, GlossaryTerm};
//! use glossarium_core::services::TermService;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("glossarium.db")).await?);
//!     let service = TermService::new(Arc::new(TursoStore::new(db)));
//!
//!     let glossary = service.create_glossary(Glossary::new("Finance")).await?;
//!     let term = service
//!         .create(GlossaryTerm::new("Revenue", glossary.entity_reference()))
//!         .await?;
//!     assert_eq!(term.fully_qualified_name.as_deref(), Some("Finance.Revenue"));
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod models;
pub mod services;

pub use db::{CatalogStore, DatabaseService, TursoStore};
pub use models::{EntityReference, EntityType, Fields, Glossary, GlossaryTerm, RelationshipKind};
pub use services::{TermService, TermServiceError};
