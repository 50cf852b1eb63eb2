//! Glossary Term Data Structures
//!
//! This module defines the two faces of a glossary term:
//!
//! - `TermRecord` - the persisted body. Contains no relationship-valued fields;
//!   relationships live as edges and are never serialized into the stored JSON.
//! - `GlossaryTerm` - the transient presentation value assembled by the read
//!   path. Relationship-valued fields are `Option`-wrapped so callers can
//!   distinguish "not loaded" from "empty".
//!
//! The split replaces the strip-before-store / restore-after-store mutation
//! dance: a `GlossaryTerm` is converted to a `TermRecord` for storage, and a
//! `TermRecord` is lifted back into a `GlossaryTerm` on read.
//!
//! # Examples
//!
//! ```rust
//! use glossarium_core::models::{EntityReference, EntityType, GlossaryTerm};
//! use uuid::Uuid;
//!
//! let glossary = EntityReference::new(Uuid::new_v4(), EntityType::Glossary)
//!     .with_name("Finance")
//!     .with_fqn("Finance");
//!
//! let term = GlossaryTerm::new("Revenue", glossary);
//! assert!(term.validate().is_ok());
//! assert!(term.children.is_none()); // derived, never set by construction
//! ```

use crate::models::entity_ref::{EntityReference, EntityType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for term values
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid reference in field {field}: {reason}")]
    InvalidReference { field: String, reason: String },

    #[error("Invalid name: {0}")]
    InvalidName(String),
}

/// Workflow status of a term.
///
/// Who may advance `Draft` to `Approved` is an authorization concern outside
/// this crate; the engine records the transition as a plain value change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TermStatus {
    Draft,
    Approved,
    Deprecated,
}

/// Who provided an entity. System-provided entities have immutable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProviderType {
    User,
    System,
}

/// External documentation link attached to a term.
///
/// Value type: diff equality is by (name, endpoint), not identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermReference {
    pub name: String,
    pub endpoint: String,
}

impl TermReference {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Classification tag attached to a term.
///
/// Recorded as a name-keyed row in the tag-usage table, where the term's FQN
/// is the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagLabel {
    /// FQN of the tag being applied
    pub tag_fqn: String,
    /// Origin of the label (e.g. "classification", "glossary")
    pub source: String,
}

fn default_version() -> i64 {
    1
}

/// Persisted body of a glossary term.
///
/// This is exactly what is stored in the `entities` table body column.
/// Relationship-valued fields (glossary, parent, children, related terms,
/// reviewers, tags) are intentionally absent: they are derived from edges
/// and tag-usage rows on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRecord {
    /// Unique identifier
    pub id: Uuid,

    /// Local name (last FQN segment)
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Dotted path from the glossary root to this term
    pub fully_qualified_name: String,

    /// Alternate names, order-preserving
    #[serde(default)]
    pub synonyms: Vec<String>,

    /// External documentation links, order-preserving
    #[serde(default)]
    pub references: Vec<TermReference>,

    /// Workflow status
    pub status: TermStatus,

    /// Origin of the term; `System` terms cannot be renamed
    pub provider: ProviderType,

    /// Bumped on every update by the storage layer
    #[serde(default = "default_version")]
    pub version: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,
}

/// Presentation value of a glossary term, assembled by the read path.
///
/// Relationship-valued and derived fields are `Option`-wrapped: `None` means
/// "not requested / not loaded", `Some(vec![])` means "loaded and empty".
/// `children` and `usage_count` are derived only, never accepted as input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTerm {
    pub id: Uuid,
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Computed from the glossary/parent chain; set by the prepare step on
    /// create and update, present on any term loaded from storage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_qualified_name: Option<String>,

    /// The glossary this term belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glossary: Option<EntityReference>,

    /// Same-kind ancestor, or `None` for a direct child of the glossary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityReference>,

    /// Derived: one-hop `Contains` lookup. Never patchable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<EntityReference>>,

    /// Symmetric cross-references to other terms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_terms: Option<Vec<EntityReference>>,

    /// Assigned reviewers; inherited from the glossary at create time when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewers: Option<Vec<EntityReference>>,

    /// Classification tags attached to the term
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagLabel>>,

    #[serde(default)]
    pub synonyms: Option<Vec<String>>,

    #[serde(default)]
    pub references: Option<Vec<TermReference>>,

    pub status: TermStatus,
    pub provider: ProviderType,

    /// Derived: count of tag usages keyed by this term's FQN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<i64>,
}

impl GlossaryTerm {
    /// Create a new draft term under a glossary, with a fresh id.
    ///
    /// The FQN is left unset; it is computed by the lifecycle controller's
    /// prepare step once the glossary and parent are resolved.
    pub fn new(name: impl Into<String>, glossary: EntityReference) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            fully_qualified_name: None,
            glossary: Some(glossary),
            parent: None,
            children: None,
            related_terms: None,
            reviewers: None,
            tags: None,
            synonyms: None,
            references: None,
            status: TermStatus::Draft,
            provider: ProviderType::User,
            usage_count: None,
        }
    }

    /// Place the term under a parent term instead of directly under the glossary
    pub fn with_parent(mut self, parent: EntityReference) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Validate structural requirements before any storage interaction.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - `name` is empty or contains the FQN separator
    /// - no glossary reference is set
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()));
        }
        if self.name.contains('.') {
            return Err(ValidationError::InvalidName(format!(
                "name '{}' must not contain '.'",
                self.name
            )));
        }
        if self.glossary.is_none() {
            return Err(ValidationError::MissingField("glossary".to_string()));
        }
        Ok(())
    }

    /// Convert to the persisted body, dropping every relationship-valued field.
    ///
    /// Requires the FQN to have been computed; callers run the prepare step
    /// first.
    pub fn to_record(
        &self,
        version: i64,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> Result<TermRecord, ValidationError> {
        let fqn = self
            .fully_qualified_name
            .clone()
            .ok_or_else(|| ValidationError::MissingField("fullyQualifiedName".to_string()))?;
        Ok(TermRecord {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            fully_qualified_name: fqn,
            synonyms: self.synonyms.clone().unwrap_or_default(),
            references: self.references.clone().unwrap_or_default(),
            status: self.status,
            provider: self.provider,
            version,
            created_at,
            modified_at,
        })
    }

    /// Lift a stored record into a presentation value.
    ///
    /// Relationship-valued fields start as `None`; the read path fills in
    /// whichever ones the caller requested.
    pub fn from_record(record: TermRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            fully_qualified_name: Some(record.fully_qualified_name),
            glossary: None,
            parent: None,
            children: None,
            related_terms: None,
            reviewers: None,
            tags: None,
            synonyms: Some(record.synonyms),
            references: Some(record.references),
            status: record.status,
            provider: record.provider,
            usage_count: None,
        }
    }

    /// Reference to this term, with cached name and FQN when available
    pub fn entity_reference(&self) -> EntityReference {
        let mut reference =
            EntityReference::new(self.id, EntityType::GlossaryTerm).with_name(self.name.clone());
        if let Some(fqn) = &self.fully_qualified_name {
            reference = reference.with_fqn(fqn.clone());
        }
        reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finance_glossary() -> EntityReference {
        EntityReference::new(Uuid::new_v4(), EntityType::Glossary)
            .with_name("Finance")
            .with_fqn("Finance")
    }

    #[test]
    fn test_validate_requires_name_and_glossary() {
        let term = GlossaryTerm::new("Revenue", finance_glossary());
        assert!(term.validate().is_ok());

        let mut unnamed = term.clone();
        unnamed.name = String::new();
        assert!(matches!(
            unnamed.validate(),
            Err(ValidationError::MissingField(f)) if f == "name"
        ));

        let mut orphan = term.clone();
        orphan.glossary = None;
        assert!(matches!(
            orphan.validate(),
            Err(ValidationError::MissingField(f)) if f == "glossary"
        ));
    }

    #[test]
    fn test_validate_rejects_separator_in_name() {
        let term = GlossaryTerm::new("Gross.Revenue", finance_glossary());
        assert!(matches!(
            term.validate(),
            Err(ValidationError::InvalidName(_))
        ));
    }

    #[test]
    fn test_to_record_strips_relationships() {
        let now = Utc::now();
        let mut term = GlossaryTerm::new("Revenue", finance_glossary());
        term.fully_qualified_name = Some("Finance.Revenue".to_string());
        term.related_terms = Some(vec![EntityReference::new(
            Uuid::new_v4(),
            EntityType::GlossaryTerm,
        )]);
        term.reviewers = Some(vec![EntityReference::new(Uuid::new_v4(), EntityType::User)]);

        let record = term.to_record(1, now, now).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("relatedTerms").is_none());
        assert!(json.get("reviewers").is_none());
        assert!(json.get("glossary").is_none());
        assert_eq!(json["fullyQualifiedName"], "Finance.Revenue");
    }

    #[test]
    fn test_to_record_requires_fqn() {
        let now = Utc::now();
        let term = GlossaryTerm::new("Revenue", finance_glossary());
        assert!(term.to_record(1, now, now).is_err());
    }

    #[test]
    fn test_from_record_leaves_relationships_unloaded() {
        let now = Utc::now();
        let mut term = GlossaryTerm::new("Revenue", finance_glossary());
        term.fully_qualified_name = Some("Finance.Revenue".to_string());
        let record = term.to_record(1, now, now).unwrap();

        let loaded = GlossaryTerm::from_record(record);
        assert!(loaded.glossary.is_none());
        assert!(loaded.children.is_none());
        assert!(loaded.usage_count.is_none());
        assert_eq!(loaded.synonyms, Some(vec![]));
    }
}
