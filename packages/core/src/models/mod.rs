//! Data Models
//!
//! This module contains the value types used throughout Glossarium:
//!
//! - `EntityReference` / `EntityType` / `RelationshipKind` - typed pointers and edge kinds
//! - `GlossaryTerm` / `TermRecord` - presentation vs. persisted faces of a term
//! - `ChangeDescription` / `FieldChange` - audit-diff values emitted by updates
//! - `Fields` - requested-field sets gating derived-field loading on read

mod change;
mod entity_ref;
mod fields;
mod glossary;
mod term;

pub use change::{ChangeDescription, FieldChange};
pub use entity_ref::{EntityReference, EntityType, RelationshipKind};
pub use fields::{field, Fields};
pub use glossary::{Glossary, GlossaryRecord};
pub use term::{
    GlossaryTerm, ProviderType, TagLabel, TermRecord, TermReference, TermStatus, ValidationError,
};
