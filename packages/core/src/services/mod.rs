//! Service Layer
//!
//! Business logic over the `CatalogStore` abstraction:
//!
//! - `fqn` - fully-qualified-name computation, prefix checks, hierarchy rules
//! - `diff` - relationship-list diffing and change recording
//! - `term_service` - the glossary/term lifecycle controller and its
//!   per-entity-kind update strategy

pub mod diff;
pub mod fqn;
mod error;
mod term_service;

pub use diff::{diff_list, update_from_relationships, update_to_relationships, ChangeRecorder};
pub use error::TermServiceError;
pub use term_service::{EntityUpdater, TermService, TermUpdater};
