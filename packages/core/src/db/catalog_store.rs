//! CatalogStore Trait - Storage Abstraction Layer
//!
//! This module defines the `CatalogStore` trait that abstracts the relational
//! substrate for the relationship engine. The trait sits between the service
//! layer (lifecycle controller, FQN engine, diff engine) and the libsql
//! implementation, so business logic never touches SQL.
//!
//! # Method Categories
//!
//! - **Entity bodies**: store/get/delete of serialized persisted records
//! - **Relationship edges**: typed edge upsert, delete, and one-hop queries
//! - **FQN maintenance**: bulk prefix rewrite backing cascade rename
//! - **Tag usage**: name-keyed classification-tag attachments
//!
//! All methods are async and implementations must be `Send + Sync`. Failures
//! are opaque storage errors (`anyhow::Result`); the service layer wraps them
//! without retrying.

use crate::models::{EntityReference, EntityType, RelationshipKind, TagLabel};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// One stored entity row: identity columns plus the serialized body.
///
/// The body is the persisted record of the entity kind (e.g. a `TermRecord`)
/// and never contains relationship-valued fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRow {
    pub id: Uuid,
    pub entity_type: EntityType,
    pub name: String,
    pub fqn: String,
    pub body: Value,
    pub version: i64,
}

impl EntityRow {
    pub fn new(
        id: Uuid,
        entity_type: EntityType,
        name: impl Into<String>,
        fqn: impl Into<String>,
        body: Value,
    ) -> Self {
        Self {
            id,
            entity_type,
            name: name.into(),
            fqn: fqn.into(),
            body,
            version: 1,
        }
    }

    /// Typed pointer to this row, with cached name and FQN
    pub fn entity_reference(&self) -> EntityReference {
        EntityReference::new(self.id, self.entity_type)
            .with_name(self.name.clone())
            .with_fqn(self.fqn.clone())
    }
}

/// Abstraction layer for the relational substrate.
///
/// The engine holds no state across calls; this store is the single source
/// of truth for entity bodies, edges, and tag usages.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    //
    // ENTITY BODY OPERATIONS
    //

    /// Persist an entity row.
    ///
    /// With `is_update = false` this inserts a new row; with `is_update = true`
    /// it replaces the body, name, fqn, and version of an existing row and
    /// refreshes its modification timestamp.
    async fn store_entity(&self, row: EntityRow, is_update: bool) -> Result<()>;

    /// Fetch an entity row by id. `Ok(None)` when absent (not an error).
    async fn get_entity(&self, id: Uuid) -> Result<Option<EntityRow>>;

    /// Fetch an entity row by fully-qualified name.
    async fn get_entity_by_fqn(&self, fqn: &str) -> Result<Option<EntityRow>>;

    /// Delete an entity row. Returns whether a row existed.
    ///
    /// Does NOT touch edges or tag usages; edge cleanup policy belongs to the
    /// lifecycle controller, and dangling edges are tolerated by readers.
    async fn delete_entity(&self, id: Uuid) -> Result<bool>;

    //
    // RELATIONSHIP EDGE OPERATIONS
    //

    /// Idempotent upsert of one typed edge.
    ///
    /// Bidirectional kinds are stored as this single row with the flag set;
    /// no mirror row is ever written.
    async fn add_edge(
        &self,
        from: &EntityReference,
        to: &EntityReference,
        kind: RelationshipKind,
        bidirectional: bool,
    ) -> Result<()>;

    /// Remove the matching edge; no-op when absent.
    ///
    /// For rows flagged bidirectional the orientation is immaterial: the
    /// (from, to) pair matches the stored row in either direction.
    async fn delete_edge(&self, from_id: Uuid, to_id: Uuid, kind: RelationshipKind) -> Result<()>;

    /// References on the "to" side of edges where `id` is the "from" side.
    ///
    /// Dangling edges (target row no longer stored) are skipped.
    async fn find_from(
        &self,
        id: Uuid,
        from_type: EntityType,
        kind: RelationshipKind,
        to_type: EntityType,
    ) -> Result<Vec<EntityReference>>;

    /// References on the "from" side of edges where `id` is the "to" side.
    async fn find_to(
        &self,
        id: Uuid,
        to_type: EntityType,
        kind: RelationshipKind,
        from_type: EntityType,
    ) -> Result<Vec<EntityReference>>;

    /// For bidirectional kinds: union of both directions, deduplicated.
    ///
    /// From-direction edges match unconditionally; to-direction edges match
    /// only when their bidirectional flag is set.
    async fn find_both(
        &self,
        id: Uuid,
        entity_type: EntityType,
        kind: RelationshipKind,
        other_type: EntityType,
    ) -> Result<Vec<EntityReference>>;

    //
    // FQN MAINTENANCE
    //

    /// Bulk prefix rewrite backing cascade rename.
    ///
    /// Rewrites the `fqn` column and the `fullyQualifiedName` field inside
    /// the stored body for the row whose FQN equals `old_fqn` and for every
    /// row whose FQN starts with `old_fqn + "."`. Returns the number of rows
    /// rewritten. Running it again with the same arguments matches nothing.
    async fn update_fqn_prefix(&self, old_fqn: &str, new_fqn: &str) -> Result<u64>;

    //
    // TAG USAGE OPERATIONS
    //

    /// Record one tag attachment against a target FQN (idempotent).
    async fn add_tag_label(&self, label: &TagLabel, target_fqn: &str) -> Result<()>;

    /// Remove one tag attachment; no-op when absent.
    async fn delete_tag_label(&self, tag_fqn: &str, target_fqn: &str) -> Result<()>;

    /// Labels attached to the given target FQN.
    async fn target_tag_labels(&self, target_fqn: &str) -> Result<Vec<TagLabel>>;

    /// Count attachments where `fqn` is the applied tag.
    async fn count_tag_usages(&self, fqn: &str) -> Result<i64>;

    /// Remove every attachment where `fqn` is the applied tag. Returns the
    /// number of rows removed.
    async fn delete_tag_labels(&self, fqn: &str) -> Result<u64>;

    /// Prefix rewrite of both the tag and target columns, mirroring
    /// `update_fqn_prefix` for name-keyed attachments.
    async fn rename_tag_targets(&self, old_fqn: &str, new_fqn: &str) -> Result<u64>;

    /// Target FQNs labeled by the given tag.
    async fn tag_target_fqns(&self, tag_fqn: &str) -> Result<Vec<String>>;
}
