//! Entity References and Relationship Types
//!
//! This module defines the typed pointers used throughout Glossarium:
//!
//! - `EntityType` - closed enumeration of entity kinds known to the engine
//! - `RelationshipKind` - closed enumeration of edge types
//! - `EntityReference` - a typed pointer to an entity, never owning it
//!
//! References are lookup keys: they carry an id, a type tag, and an optional
//! cached name/FQN. Two references denote the same entity when their ids and
//! type tags match, regardless of cached fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Entity kinds known to the relationship engine.
///
/// The engine is domain-agnostic over these tags: edges relate `(id, type)`
/// pairs, so one store serves glossaries, terms, users, and classifications
/// without per-kind tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    /// Top-level container a term hierarchy belongs to
    Glossary,
    /// A term node, organized in an arbitrary-depth tree under a glossary
    GlossaryTerm,
    /// A reviewer account
    User,
    /// A classification tag definition
    Classification,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityType::Glossary => "glossary",
            EntityType::GlossaryTerm => "glossaryTerm",
            EntityType::User => "user",
            EntityType::Classification => "classification",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "glossary" => Ok(EntityType::Glossary),
            "glossaryTerm" => Ok(EntityType::GlossaryTerm),
            "user" => Ok(EntityType::User),
            "classification" => Ok(EntityType::Classification),
            other => Err(format!("Unknown entity type: {}", other)),
        }
    }
}

/// Typed edge kinds.
///
/// A small closed enumeration by design: the engine answers one-hop queries
/// over these kinds, it is not a general graph database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    /// Hierarchical parent -> child containment. A child has at most one
    /// `Contains` parent per container type.
    Contains,
    /// Symmetric cross-reference between terms. Stored as a single row with
    /// the bidirectional flag set.
    RelatedTo,
    /// Reviewer -> entity review assignment.
    Reviews,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelationshipKind::Contains => "contains",
            RelationshipKind::RelatedTo => "relatedTo",
            RelationshipKind::Reviews => "reviews",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RelationshipKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contains" => Ok(RelationshipKind::Contains),
            "relatedTo" => Ok(RelationshipKind::RelatedTo),
            "reviews" => Ok(RelationshipKind::Reviews),
            other => Err(format!("Unknown relationship kind: {}", other)),
        }
    }
}

/// A typed pointer to an entity.
///
/// Never owns the referenced entity. The `name` and `fully_qualified_name`
/// fields are caches populated by the read path or by reference resolution;
/// they do not participate in identity.
///
/// # Examples
///
/// ```rust
/// use glossarium_core::models::{EntityReference, EntityType};
/// use uuid::Uuid;
///
/// let glossary = EntityReference::new(Uuid::new_v4(), EntityType::Glossary)
///     .with_name("Finance")
///     .with_fqn("Finance");
/// assert_eq!(glossary.fully_qualified_name.as_deref(), Some("Finance"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityReference {
    /// Unique identifier of the referenced entity
    pub id: Uuid,

    /// Kind of the referenced entity
    pub entity_type: EntityType,

    /// Cached display name, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Cached fully-qualified name, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_qualified_name: Option<String>,
}

impl EntityReference {
    /// Create a reference carrying only identity (no cached names)
    pub fn new(id: Uuid, entity_type: EntityType) -> Self {
        Self {
            id,
            entity_type,
            name: None,
            fully_qualified_name: None,
        }
    }

    /// Attach a cached display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a cached fully-qualified name
    pub fn with_fqn(mut self, fqn: impl Into<String>) -> Self {
        self.fully_qualified_name = Some(fqn.into());
        self
    }

    /// Identity comparison: same id and type tag, cached fields ignored.
    ///
    /// This is the equality predicate used when diffing relationship lists,
    /// so that re-resolving a reference (which refreshes its cached FQN)
    /// never shows up as a relationship change.
    pub fn same_entity(&self, other: &EntityReference) -> bool {
        self.id == other.id && self.entity_type == other.entity_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_round_trip() {
        for t in [
            EntityType::Glossary,
            EntityType::GlossaryTerm,
            EntityType::User,
            EntityType::Classification,
        ] {
            assert_eq!(t.to_string().parse::<EntityType>().unwrap(), t);
        }
    }

    #[test]
    fn test_relationship_kind_round_trip() {
        for k in [
            RelationshipKind::Contains,
            RelationshipKind::RelatedTo,
            RelationshipKind::Reviews,
        ] {
            assert_eq!(k.to_string().parse::<RelationshipKind>().unwrap(), k);
        }
    }

    #[test]
    fn test_same_entity_ignores_cached_fields() {
        let id = Uuid::new_v4();
        let a = EntityReference::new(id, EntityType::GlossaryTerm).with_fqn("Finance.Revenue");
        let b = EntityReference::new(id, EntityType::GlossaryTerm);
        assert!(a.same_entity(&b));

        let c = EntityReference::new(id, EntityType::Glossary);
        assert!(!a.same_entity(&c));
    }
}
