//! Glossary Term Lifecycle Controller
//!
//! Orchestrates create, read, update, patch, and delete for glossary terms
//! over the `CatalogStore` abstraction. The controller owns the sequencing
//! rules:
//!
//! - **Create**: validate, resolve references, compute the FQN, inherit
//!   reviewers from the glossary when the term brings none, store the body
//!   (relationships never serialize into it), then write edges and tag labels.
//! - **Read**: load the stored body and reconstruct only the derived fields
//!   the caller asked for.
//! - **Update/Patch**: diff against stored state via `TermUpdater`, applying
//!   value fields first and identity fields (name, parent, glossary) last so
//!   the cascade rename observes a fully-updated record.
//! - **Delete**: remove the body and tag labels keyed by the term's FQN.
//!   Edges pointing at the deleted term are left behind; the read path
//!   tolerates and skips them.

use crate::db::{CatalogStore, EntityRow};
use crate::models::{
    field, ChangeDescription, EntityReference, EntityType, Fields, Glossary, GlossaryTerm,
    ProviderType, RelationshipKind, TermRecord,
};
use crate::services::diff::{
    diff_list, update_from_relationships, update_to_relationships, ChangeRecorder,
};
use crate::services::error::TermServiceError;
use crate::services::fqn;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Per-entity-kind update strategy.
///
/// An updater knows the field inventory of one entity kind and applies each
/// field in a fixed order, accumulating a `ChangeDescription`. Identity
/// fields (name, containment) always run last.
#[async_trait]
pub trait EntityUpdater: Send {
    async fn apply(&mut self) -> Result<ChangeDescription, TermServiceError>;
}

/// Update strategy for glossary terms.
///
/// `original` is the stored state with all derived fields loaded; `updated`
/// is the prepared desired state (references resolved, FQN computed).
pub struct TermUpdater<'a> {
    store: &'a dyn CatalogStore,
    original: &'a GlossaryTerm,
    updated: &'a mut GlossaryTerm,
    recorder: ChangeRecorder,
}

impl<'a> TermUpdater<'a> {
    pub fn new(
        store: &'a dyn CatalogStore,
        original: &'a GlossaryTerm,
        updated: &'a mut GlossaryTerm,
    ) -> Self {
        Self {
            store,
            original,
            updated,
            recorder: ChangeRecorder::new(),
        }
    }

    fn record_value_fields(&mut self) -> Result<(), TermServiceError> {
        self.recorder.record_change(
            "status",
            Some(&self.original.status),
            Some(&self.updated.status),
        )?;
        self.recorder.record_change(
            "description",
            Some(&self.original.description),
            Some(&self.updated.description),
        )?;
        self.recorder.record_list_change(
            "synonyms",
            self.original.synonyms.as_deref().unwrap_or_default(),
            self.updated.synonyms.as_deref().unwrap_or_default(),
            |a, b| a == b,
        )?;
        self.recorder.record_list_change(
            "references",
            self.original.references.as_deref().unwrap_or_default(),
            self.updated.references.as_deref().unwrap_or_default(),
            |a, b| a == b,
        )?;
        Ok(())
    }

    /// Reconcile the term's classification labels. Labels added to the term
    /// also propagate to every asset currently labeled by the term; removals
    /// detach from the term only.
    async fn update_tag_labels(&mut self) -> Result<(), TermServiceError> {
        let original_tags = self.original.tags.as_deref().unwrap_or_default();
        let updated_tags = self.updated.tags.as_deref().unwrap_or_default();
        let (added, removed) = diff_list(original_tags, updated_tags, |a, b| a == b);
        if added.is_empty() && removed.is_empty() {
            return Ok(());
        }

        let term_fqn = self
            .original
            .fully_qualified_name
            .as_deref()
            .ok_or_else(|| TermServiceError::invalid_update("stored term has no FQN"))?;

        let targets = self.store.tag_target_fqns(term_fqn).await?;
        for label in &added {
            self.store.add_tag_label(label, term_fqn).await?;
            for target in &targets {
                self.store.add_tag_label(label, target).await?;
            }
        }
        for label in &removed {
            self.store.delete_tag_label(&label.tag_fqn, term_fqn).await?;
        }
        self.recorder
            .record_list_change(field::TAGS, original_tags, updated_tags, |a, b| a == b)?;
        Ok(())
    }

    async fn update_relationship_fields(&mut self) -> Result<(), TermServiceError> {
        let term_ref = self.updated.entity_reference();
        update_to_relationships(
            self.store,
            &term_ref,
            RelationshipKind::RelatedTo,
            true,
            self.original.related_terms.as_deref().unwrap_or_default(),
            self.updated.related_terms.as_deref().unwrap_or_default(),
            &mut self.recorder,
            field::RELATED_TERMS,
        )
        .await?;
        update_from_relationships(
            self.store,
            &term_ref,
            RelationshipKind::Reviews,
            self.original.reviewers.as_deref().unwrap_or_default(),
            self.updated.reviewers.as_deref().unwrap_or_default(),
            &mut self.recorder,
            field::REVIEWERS,
        )
        .await?;
        Ok(())
    }

    /// Identity fields: name, glossary, parent. Runs last so every other
    /// field has already been reconciled when the cascade fires.
    async fn update_identity_fields(&mut self) -> Result<(), TermServiceError> {
        if self.original.name != self.updated.name {
            if self.original.provider == ProviderType::System {
                return Err(TermServiceError::immutable_identity(&self.original.name));
            }
            self.recorder.record_change(
                "name",
                Some(&self.original.name),
                Some(&self.updated.name),
            )?;
        }

        let glossary_changed = !same_optional_entity(
            self.original.glossary.as_ref(),
            self.updated.glossary.as_ref(),
        );
        let parent_changed =
            !same_optional_entity(self.original.parent.as_ref(), self.updated.parent.as_ref());
        if glossary_changed {
            self.recorder.record_change(
                field::GLOSSARY,
                self.original.glossary.as_ref(),
                self.updated.glossary.as_ref(),
            )?;
        }
        if parent_changed {
            self.recorder.record_change(
                field::PARENT,
                self.original.parent.as_ref(),
                self.updated.parent.as_ref(),
            )?;
        }

        // Any identity change moves the FQN; cascade before the edges so the
        // rename observes the old tree shape.
        let old_fqn = self
            .original
            .fully_qualified_name
            .as_deref()
            .ok_or_else(|| TermServiceError::invalid_update("stored term has no FQN"))?;
        let new_fqn = self
            .updated
            .fully_qualified_name
            .as_deref()
            .ok_or_else(|| TermServiceError::invalid_update("updated term has no FQN"))?;
        if old_fqn != new_fqn {
            // Reject the collision up front; mid-cascade the UNIQUE
            // constraint on entities.fqn would fail after partial writes.
            if self.store.get_entity_by_fqn(new_fqn).await?.is_some() {
                return Err(TermServiceError::invalid_update(format!(
                    "an entity named '{}' already exists",
                    new_fqn
                )));
            }
            cascade_rename(self.store, old_fqn, new_fqn).await?;
        }

        let term_ref = self.updated.entity_reference();
        if glossary_changed {
            if let Some(old_glossary) = &self.original.glossary {
                self.store
                    .delete_edge(old_glossary.id, term_ref.id, RelationshipKind::Contains)
                    .await?;
            }
            if let Some(new_glossary) = &self.updated.glossary {
                self.store
                    .add_edge(new_glossary, &term_ref, RelationshipKind::Contains, false)
                    .await?;
            }
        }
        if parent_changed {
            if let Some(old_parent) = &self.original.parent {
                self.store
                    .delete_edge(old_parent.id, term_ref.id, RelationshipKind::Contains)
                    .await?;
            }
            if let Some(new_parent) = &self.updated.parent {
                self.store
                    .add_edge(new_parent, &term_ref, RelationshipKind::Contains, false)
                    .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<'a> EntityUpdater for TermUpdater<'a> {
    async fn apply(&mut self) -> Result<ChangeDescription, TermServiceError> {
        self.record_value_fields()?;
        self.update_tag_labels().await?;
        self.update_relationship_fields().await?;
        self.update_identity_fields().await?;
        Ok(std::mem::take(&mut self.recorder).into_description())
    }
}

fn same_optional_entity(a: Option<&EntityReference>, b: Option<&EntityReference>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same_entity(b),
        _ => false,
    }
}

/// Rewrite the FQN of a term and every descendant, then the tag-usage rows
/// keyed by those FQNs. Idempotent: a second run matches nothing.
async fn cascade_rename(
    store: &dyn CatalogStore,
    old_fqn: &str,
    new_fqn: &str,
) -> Result<(), TermServiceError> {
    let entities = store.update_fqn_prefix(old_fqn, new_fqn).await?;
    let tag_rows = store.rename_tag_targets(old_fqn, new_fqn).await?;
    tracing::info!(
        old_fqn = %old_fqn,
        new_fqn = %new_fqn,
        entities_renamed = entities,
        tag_rows_renamed = tag_rows,
        "Cascaded FQN rename"
    );
    Ok(())
}

/// Lifecycle controller for glossaries and their terms.
pub struct TermService {
    store: Arc<dyn CatalogStore>,
}

impl TermService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Create a glossary, storing its reviewers as `Reviews` edges.
    pub async fn create_glossary(&self, mut glossary: Glossary) -> Result<Glossary, TermServiceError> {
        glossary.validate()?;
        if self.store.get_entity_by_fqn(&glossary.name).await?.is_some() {
            return Err(TermServiceError::invalid_update(format!(
                "an entity named '{}' already exists",
                glossary.name
            )));
        }
        if let Some(reviewers) = &glossary.reviewers {
            glossary.reviewers = Some(self.resolve_references(reviewers).await?);
        }

        let now = Utc::now();
        let record = glossary.to_record(1, now, now);
        let row = EntityRow::new(
            glossary.id,
            EntityType::Glossary,
            &glossary.name,
            &glossary.name,
            serde_json::to_value(&record)?,
        );
        self.store.store_entity(row, false).await?;

        let glossary_ref = glossary.entity_reference();
        if let Some(reviewers) = &glossary.reviewers {
            for reviewer in reviewers {
                self.store
                    .add_edge(reviewer, &glossary_ref, RelationshipKind::Reviews, false)
                    .await?;
            }
        }

        tracing::info!(name = %glossary.name, "Created glossary");
        Ok(glossary)
    }

    /// Create a term: prepare, store the body, then edges and tag labels.
    pub async fn create(&self, mut term: GlossaryTerm) -> Result<GlossaryTerm, TermServiceError> {
        self.prepare(&mut term, true).await?;
        let term_fqn = term
            .fully_qualified_name
            .clone()
            .ok_or_else(|| TermServiceError::invalid_update("prepared term has no FQN"))?;
        if self.store.get_entity_by_fqn(&term_fqn).await?.is_some() {
            return Err(TermServiceError::invalid_update(format!(
                "an entity named '{}' already exists",
                term_fqn
            )));
        }

        let now = Utc::now();
        let record = term.to_record(1, now, now)?;
        let row = EntityRow::new(
            term.id,
            EntityType::GlossaryTerm,
            &term.name,
            &term_fqn,
            serde_json::to_value(&record)?,
        );
        self.store.store_entity(row, false).await?;
        self.store_relationships(&term).await?;
        self.apply_tags(&term).await?;

        tracing::info!(fqn = %term_fqn, "Created glossary term");
        Ok(term)
    }

    /// Load a term, reconstructing only the requested derived fields.
    pub async fn get_with_fields(
        &self,
        id: Uuid,
        fields: &Fields,
    ) -> Result<GlossaryTerm, TermServiceError> {
        let row = self
            .store
            .get_entity(id)
            .await?
            .filter(|row| row.entity_type == EntityType::GlossaryTerm)
            .ok_or_else(|| TermServiceError::term_not_found(id))?;
        let record: TermRecord = serde_json::from_value(row.body)?;
        let term_fqn = record.fully_qualified_name.clone();
        let mut term = GlossaryTerm::from_record(record);

        if fields.contains(field::GLOSSARY) {
            term.glossary = self
                .store
                .find_to(
                    id,
                    EntityType::GlossaryTerm,
                    RelationshipKind::Contains,
                    EntityType::Glossary,
                )
                .await?
                .into_iter()
                .next();
        }
        if fields.contains(field::PARENT) {
            term.parent = self
                .store
                .find_to(
                    id,
                    EntityType::GlossaryTerm,
                    RelationshipKind::Contains,
                    EntityType::GlossaryTerm,
                )
                .await?
                .into_iter()
                .next();
        }
        if fields.contains(field::CHILDREN) {
            term.children = Some(
                self.store
                    .find_from(
                        id,
                        EntityType::GlossaryTerm,
                        RelationshipKind::Contains,
                        EntityType::GlossaryTerm,
                    )
                    .await?,
            );
        }
        if fields.contains(field::RELATED_TERMS) {
            term.related_terms = Some(
                self.store
                    .find_both(
                        id,
                        EntityType::GlossaryTerm,
                        RelationshipKind::RelatedTo,
                        EntityType::GlossaryTerm,
                    )
                    .await?,
            );
        }
        if fields.contains(field::REVIEWERS) {
            term.reviewers = Some(
                self.store
                    .find_to(
                        id,
                        EntityType::GlossaryTerm,
                        RelationshipKind::Reviews,
                        EntityType::User,
                    )
                    .await?,
            );
        }
        if fields.contains(field::TAGS) {
            term.tags = Some(self.store.target_tag_labels(&term_fqn).await?);
        }
        if fields.contains(field::USAGE_COUNT) {
            term.usage_count = Some(self.store.count_tag_usages(&term_fqn).await?);
        }
        Ok(term)
    }

    /// Replace a term with the given desired state.
    ///
    /// Relationship lists left `None` are treated as empty. The glossary
    /// reference may be omitted to keep the current one; `parent: None`
    /// moves the term to the glossary root.
    pub async fn update(
        &self,
        updated: GlossaryTerm,
    ) -> Result<(GlossaryTerm, ChangeDescription), TermServiceError> {
        let original = self.get_with_fields(updated.id, &Fields::all()).await?;
        let mut updated = updated;
        if updated.glossary.is_none() {
            updated.glossary = original.glossary.clone();
        }
        self.apply_update(original, updated).await
    }

    /// Apply a partial update: fields left `None` keep their stored value.
    ///
    /// Moving a term to the glossary root cannot be expressed here (absent
    /// and removed parent are indistinguishable); use `update` for moves.
    pub async fn patch(
        &self,
        patched: GlossaryTerm,
    ) -> Result<(GlossaryTerm, ChangeDescription), TermServiceError> {
        let original = self.get_with_fields(patched.id, &Fields::all()).await?;
        let mut updated = patched;
        if updated.glossary.is_none() {
            updated.glossary = original.glossary.clone();
        }
        if updated.parent.is_none() {
            updated.parent = original.parent.clone();
        }
        if updated.related_terms.is_none() {
            updated.related_terms = original.related_terms.clone();
        }
        if updated.reviewers.is_none() {
            updated.reviewers = original.reviewers.clone();
        }
        if updated.tags.is_none() {
            updated.tags = original.tags.clone();
        }
        if updated.synonyms.is_none() {
            updated.synonyms = original.synonyms.clone();
        }
        if updated.references.is_none() {
            updated.references = original.references.clone();
        }
        self.apply_update(original, updated).await
    }

    /// Delete a term's body and the tag labels keyed by its FQN.
    ///
    /// Edges referencing the term are left in place; readers skip them.
    pub async fn delete(&self, id: Uuid) -> Result<(), TermServiceError> {
        let row = self
            .store
            .get_entity(id)
            .await?
            .filter(|row| row.entity_type == EntityType::GlossaryTerm)
            .ok_or_else(|| TermServiceError::term_not_found(id))?;

        self.store.delete_entity(id).await?;
        let labels_removed = self.store.delete_tag_labels(&row.fqn).await?;
        tracing::info!(
            fqn = %row.fqn,
            labels_removed = labels_removed,
            "Deleted glossary term"
        );
        Ok(())
    }

    /// Validate and resolve a term's references, compute its FQN, and
    /// (on create) inherit the glossary's reviewers when the term brings
    /// none of its own.
    async fn prepare(
        &self,
        term: &mut GlossaryTerm,
        inherit_reviewers: bool,
    ) -> Result<(), TermServiceError> {
        term.validate()?;

        // validate() guarantees the glossary reference is present
        if let Some(glossary) = term.glossary.clone() {
            let resolved = self.resolve_reference(&glossary).await?;
            term.glossary = Some(resolved);
        }
        if let Some(parent) = term.parent.clone() {
            term.parent = Some(self.resolve_reference(&parent).await?);
        }

        fqn::validate_hierarchy(term)?;
        term.fully_qualified_name = Some(fqn::compute(term)?);

        if let Some(related) = &term.related_terms {
            term.related_terms = Some(self.resolve_references(related).await?);
        }
        if let Some(reviewers) = &term.reviewers {
            term.reviewers = Some(self.resolve_references(reviewers).await?);
        }

        // A term created without reviewers inherits the glossary's. An
        // explicitly empty list counts as "none brought".
        if inherit_reviewers && term.reviewers.as_ref().map_or(true, |r| r.is_empty()) {
            if let Some(glossary) = &term.glossary {
                let inherited = self
                    .store
                    .find_to(
                        glossary.id,
                        EntityType::Glossary,
                        RelationshipKind::Reviews,
                        EntityType::User,
                    )
                    .await?;
                if !inherited.is_empty() {
                    term.reviewers = Some(inherited);
                }
            }
        }
        Ok(())
    }

    async fn apply_update(
        &self,
        original: GlossaryTerm,
        mut updated: GlossaryTerm,
    ) -> Result<(GlossaryTerm, ChangeDescription), TermServiceError> {
        // Children are derived only; whatever the payload carried is ignored
        updated.children = original.children.clone();
        self.prepare(&mut updated, false).await?;

        let description = {
            let mut updater = TermUpdater::new(self.store.as_ref(), &original, &mut updated);
            updater.apply().await?
        };

        if !description.is_empty() {
            let stored = self
                .store
                .get_entity(updated.id)
                .await?
                .ok_or_else(|| TermServiceError::term_not_found(updated.id))?;
            let stored_record: TermRecord = serde_json::from_value(stored.body)?;

            let now = Utc::now();
            let record = updated.to_record(stored.version + 1, stored_record.created_at, now)?;
            let row = EntityRow {
                id: updated.id,
                entity_type: EntityType::GlossaryTerm,
                name: updated.name.clone(),
                fqn: record.fully_qualified_name.clone(),
                body: serde_json::to_value(&record)?,
                version: record.version,
            };
            self.store.store_entity(row, true).await?;
            tracing::info!(
                fqn = %record.fully_qualified_name,
                version = record.version,
                changed = ?description.changed_fields(),
                "Updated glossary term"
            );
        }
        Ok((updated, description))
    }

    async fn store_relationships(&self, term: &GlossaryTerm) -> Result<(), TermServiceError> {
        let term_ref = term.entity_reference();
        if let Some(glossary) = &term.glossary {
            self.store
                .add_edge(glossary, &term_ref, RelationshipKind::Contains, false)
                .await?;
        }
        if let Some(parent) = &term.parent {
            self.store
                .add_edge(parent, &term_ref, RelationshipKind::Contains, false)
                .await?;
        }
        if let Some(related) = &term.related_terms {
            for reference in related {
                self.store
                    .add_edge(&term_ref, reference, RelationshipKind::RelatedTo, true)
                    .await?;
            }
        }
        if let Some(reviewers) = &term.reviewers {
            for reviewer in reviewers {
                self.store
                    .add_edge(reviewer, &term_ref, RelationshipKind::Reviews, false)
                    .await?;
            }
        }
        Ok(())
    }

    async fn apply_tags(&self, term: &GlossaryTerm) -> Result<(), TermServiceError> {
        let (Some(tags), Some(term_fqn)) = (&term.tags, term.fully_qualified_name.as_deref())
        else {
            return Ok(());
        };
        for label in tags {
            self.store.add_tag_label(label, term_fqn).await?;
        }
        Ok(())
    }

    /// Refresh a reference from storage, confirming existence and type.
    async fn resolve_reference(
        &self,
        reference: &EntityReference,
    ) -> Result<EntityReference, TermServiceError> {
        let row = self
            .store
            .get_entity(reference.id)
            .await?
            .filter(|row| row.entity_type == reference.entity_type)
            .ok_or_else(|| {
                TermServiceError::reference_not_found(reference.entity_type, reference.id)
            })?;
        Ok(row.entity_reference())
    }

    async fn resolve_references(
        &self,
        references: &[EntityReference],
    ) -> Result<Vec<EntityReference>, TermServiceError> {
        let mut resolved = Vec::with_capacity(references.len());
        for reference in references {
            resolved.push(self.resolve_reference(reference).await?);
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DatabaseService, TursoStore};
    use tempfile::TempDir;

    async fn create_test_service() -> (TermService, Arc<TursoStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(DatabaseService::new(db_path).await.unwrap());
        let store = Arc::new(TursoStore::new(db));
        (TermService::new(store.clone()), store, temp_dir)
    }

    async fn insert_user(store: &TursoStore, name: &str) -> EntityReference {
        let row = EntityRow::new(
            Uuid::new_v4(),
            EntityType::User,
            name,
            name,
            serde_json::json!({ "name": name }),
        );
        store.store_entity(row.clone(), false).await.unwrap();
        row.entity_reference()
    }

    #[tokio::test]
    async fn test_create_computes_fqn_and_contains_edge() {
        let (service, _store, _temp) = create_test_service().await;

        let glossary = service
            .create_glossary(Glossary::new("Finance"))
            .await
            .unwrap();
        let term = service
            .create(GlossaryTerm::new("Revenue", glossary.entity_reference()))
            .await
            .unwrap();
        assert_eq!(
            term.fully_qualified_name.as_deref(),
            Some("Finance.Revenue")
        );

        let loaded = service
            .get_with_fields(term.id, &Fields::all())
            .await
            .unwrap();
        assert_eq!(loaded.glossary.unwrap().id, glossary.id);
        assert!(loaded.parent.is_none());
        assert_eq!(loaded.children, Some(vec![]));
        assert_eq!(loaded.usage_count, Some(0));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_fqn() {
        let (service, _store, _temp) = create_test_service().await;

        let glossary = service
            .create_glossary(Glossary::new("Finance"))
            .await
            .unwrap();
        service
            .create(GlossaryTerm::new("Revenue", glossary.entity_reference()))
            .await
            .unwrap();

        let duplicate = service
            .create(GlossaryTerm::new("Revenue", glossary.entity_reference()))
            .await;
        assert!(matches!(
            duplicate,
            Err(TermServiceError::InvalidUpdate(_))
        ));
    }

    #[tokio::test]
    async fn test_create_inherits_glossary_reviewers() {
        let (service, store, _temp) = create_test_service().await;

        let alice = insert_user(&store, "alice").await;
        let glossary = service
            .create_glossary(Glossary::new("Finance").with_reviewers(vec![alice.clone()]))
            .await
            .unwrap();

        let term = service
            .create(GlossaryTerm::new("Revenue", glossary.entity_reference()))
            .await
            .unwrap();
        let reviewers = term.reviewers.unwrap();
        assert_eq!(reviewers.len(), 1);
        assert!(reviewers[0].same_entity(&alice));

        let loaded = service
            .get_with_fields(term.id, &Fields::from_names([field::REVIEWERS]))
            .await
            .unwrap();
        assert_eq!(loaded.reviewers.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_reference() {
        let (service, _store, _temp) = create_test_service().await;

        let phantom = EntityReference::new(Uuid::new_v4(), EntityType::Glossary).with_fqn("Ghost");
        let result = service.create(GlossaryTerm::new("Revenue", phantom)).await;
        assert!(matches!(
            result,
            Err(TermServiceError::ReferenceNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_rename_of_system_term() {
        let (service, store, _temp) = create_test_service().await;

        let glossary = service
            .create_glossary(Glossary::new("Finance"))
            .await
            .unwrap();
        let mut term = GlossaryTerm::new("Revenue", glossary.entity_reference());
        term.provider = ProviderType::System;
        let term = service.create(term).await.unwrap();

        let stored = store.get_entity(term.id).await.unwrap().unwrap();
        assert_eq!(stored.body["provider"], "system");

        let mut renamed = term.clone();
        renamed.name = "Income".to_string();
        let result = service.update(renamed).await;
        assert!(matches!(
            result,
            Err(TermServiceError::ImmutableIdentity { .. })
        ));
    }

    #[tokio::test]
    async fn test_no_op_update_records_nothing_and_keeps_version() {
        let (service, store, _temp) = create_test_service().await;

        let glossary = service
            .create_glossary(Glossary::new("Finance"))
            .await
            .unwrap();
        let term = service
            .create(GlossaryTerm::new("Revenue", glossary.entity_reference()))
            .await
            .unwrap();

        let (_, description) = service.update(term.clone()).await.unwrap();
        assert!(description.is_empty());
        let stored = store.get_entity(term.id).await.unwrap().unwrap();
        assert_eq!(stored.version, 1);
    }
}
