//! Relationship Diff Engine
//!
//! Set-difference over relationship lists, plus the `ChangeRecorder` that
//! accumulates field-level changes into a `ChangeDescription`. Desired state
//! comes in as full lists; the engine computes additions and removals against
//! stored state and applies only those, leaving surviving edges untouched.

use crate::db::CatalogStore;
use crate::models::{ChangeDescription, EntityReference, FieldChange, RelationshipKind};
use crate::services::error::TermServiceError;
use serde::Serialize;

/// Order-preserving set difference.
///
/// Returns `(added, removed)`: members of `updated` absent from `original`,
/// and members of `original` absent from `updated`. Reordering alone yields
/// two empty lists. Quadratic, which is fine at relationship-list sizes.
pub fn diff_list<'a, T, F>(original: &'a [T], updated: &'a [T], eq: F) -> (Vec<&'a T>, Vec<&'a T>)
where
    F: Fn(&T, &T) -> bool,
{
    let added = updated
        .iter()
        .filter(|&u| !original.iter().any(|o| eq(o, u)))
        .collect();
    let removed = original
        .iter()
        .filter(|&o| !updated.iter().any(|u| eq(o, u)))
        .collect();
    (added, removed)
}

/// Accumulates field changes for one update operation.
///
/// Values are compared and stored as serialized JSON so the resulting
/// `ChangeDescription` is self-contained.
#[derive(Debug, Default)]
pub struct ChangeRecorder {
    changes: ChangeDescription,
}

impl ChangeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scalar field change. Returns whether the values differed.
    ///
    /// `None -> Some` records an addition, `Some -> None` a deletion, and
    /// differing `Some -> Some` an update. Equal values record nothing.
    pub fn record_change<T: Serialize>(
        &mut self,
        name: &str,
        old: Option<&T>,
        new: Option<&T>,
    ) -> Result<bool, serde_json::Error> {
        let old_value = old.map(serde_json::to_value).transpose()?;
        let new_value = new.map(serde_json::to_value).transpose()?;

        if old_value == new_value {
            return Ok(false);
        }

        let change = FieldChange {
            name: name.to_string(),
            old_value: old_value.clone(),
            new_value: new_value.clone(),
        };
        match (old_value, new_value) {
            (None, Some(_)) => self.changes.fields_added.push(change),
            (Some(_), None) => self.changes.fields_deleted.push(change),
            _ => self.changes.fields_updated.push(change),
        }
        Ok(true)
    }

    /// Record a list-valued field change as separate added/deleted entries.
    ///
    /// Only the differing members appear in the change record. Returns
    /// whether membership changed at all.
    pub fn record_list_change<T: Serialize, F>(
        &mut self,
        name: &str,
        original: &[T],
        updated: &[T],
        eq: F,
    ) -> Result<bool, serde_json::Error>
    where
        F: Fn(&T, &T) -> bool,
    {
        let (added, removed) = diff_list(original, updated, eq);
        let changed = !added.is_empty() || !removed.is_empty();

        if !added.is_empty() {
            self.changes.fields_added.push(FieldChange {
                name: name.to_string(),
                old_value: None,
                new_value: Some(serde_json::to_value(&added)?),
            });
        }
        if !removed.is_empty() {
            self.changes.fields_deleted.push(FieldChange {
                name: name.to_string(),
                old_value: Some(serde_json::to_value(&removed)?),
                new_value: None,
            });
        }
        Ok(changed)
    }

    pub fn into_description(self) -> ChangeDescription {
        self.changes
    }
}

/// Reconcile edges where the entity is the "from" side (e.g. related terms).
///
/// Adds an edge per member of `updated` missing from `original` and deletes
/// one per member of `original` missing from `updated`. Surviving edges are
/// never rewritten. Membership uses identity comparison, so refreshed cached
/// names never register as changes.
pub async fn update_to_relationships(
    store: &dyn CatalogStore,
    from: &EntityReference,
    kind: RelationshipKind,
    bidirectional: bool,
    original: &[EntityReference],
    updated: &[EntityReference],
    recorder: &mut ChangeRecorder,
    field_name: &str,
) -> Result<bool, TermServiceError> {
    let (added, removed) = diff_list(original, updated, EntityReference::same_entity);
    for reference in &added {
        store.add_edge(from, reference, kind, bidirectional).await?;
    }
    for reference in &removed {
        store.delete_edge(from.id, reference.id, kind).await?;
    }
    recorder.record_list_change(field_name, original, updated, EntityReference::same_entity)?;
    Ok(!added.is_empty() || !removed.is_empty())
}

/// Reconcile edges where the entity is the "to" side (e.g. reviewers).
pub async fn update_from_relationships(
    store: &dyn CatalogStore,
    to: &EntityReference,
    kind: RelationshipKind,
    original: &[EntityReference],
    updated: &[EntityReference],
    recorder: &mut ChangeRecorder,
    field_name: &str,
) -> Result<bool, TermServiceError> {
    let (added, removed) = diff_list(original, updated, EntityReference::same_entity);
    for reference in &added {
        store.add_edge(reference, to, kind, false).await?;
    }
    for reference in &removed {
        store.delete_edge(reference.id, to.id, kind).await?;
    }
    recorder.record_list_change(field_name, original, updated, EntityReference::same_entity)?;
    Ok(!added.is_empty() || !removed.is_empty())
}
