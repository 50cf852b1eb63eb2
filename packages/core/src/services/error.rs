//! Service Error Types
//!
//! Error type for the term lifecycle controller and its collaborators.
//! Database-level failures arrive either as `DatabaseError` (direct use of
//! `DatabaseService`) or as opaque `anyhow::Error` values crossing the
//! `CatalogStore` boundary.

use crate::db::DatabaseError;
use crate::models::{EntityType, ValidationError};
use thiserror::Error;
use uuid::Uuid;

/// Errors produced by term lifecycle operations
#[derive(Error, Debug)]
pub enum TermServiceError {
    /// Parent term lives outside the declared glossary
    #[error("Invalid hierarchy: parent '{parent_fqn}' is not inside glossary '{glossary_fqn}'")]
    HierarchyMismatch {
        parent_fqn: String,
        glossary_fqn: String,
    },

    /// Rename attempted on a system-provided term
    #[error("Cannot rename system-provided term '{name}'")]
    ImmutableIdentity { name: String },

    /// A referenced entity does not exist in the store
    #[error("Referenced {entity_type} '{id}' not found")]
    ReferenceNotFound { entity_type: EntityType, id: Uuid },

    /// The term being read or updated does not exist
    #[error("Glossary term '{id}' not found")]
    TermNotFound { id: Uuid },

    /// An update payload violates a structural rule
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    /// Structural validation failure on input values
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization of a value into a change record or body failed
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Opaque storage failure from the `CatalogStore` boundary
    #[error("Storage operation failed: {0}")]
    Storage(#[from] anyhow::Error),

    /// Database-layer failure
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl TermServiceError {
    pub fn hierarchy_mismatch(
        parent_fqn: impl Into<String>,
        glossary_fqn: impl Into<String>,
    ) -> Self {
        Self::HierarchyMismatch {
            parent_fqn: parent_fqn.into(),
            glossary_fqn: glossary_fqn.into(),
        }
    }

    pub fn immutable_identity(name: impl Into<String>) -> Self {
        Self::ImmutableIdentity { name: name.into() }
    }

    pub fn reference_not_found(entity_type: EntityType, id: Uuid) -> Self {
        Self::ReferenceNotFound { entity_type, id }
    }

    pub fn term_not_found(id: Uuid) -> Self {
        Self::TermNotFound { id }
    }

    pub fn invalid_update(reason: impl Into<String>) -> Self {
        Self::InvalidUpdate(reason.into())
    }
}
