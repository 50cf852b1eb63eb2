//! Change Records
//!
//! Structured audit-diff values produced by update operations. The engine
//! builds a `ChangeDescription` per update; storing audit history is the
//! responsibility of an external versioning collaborator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One field-level change within an update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    /// Field name the change applies to
    pub name: String,

    /// Previous value, absent for additions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,

    /// New value, absent for deletions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

/// All field-level changes recorded for one update operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDescription {
    /// Fields (or list members) that were added
    #[serde(default)]
    pub fields_added: Vec<FieldChange>,

    /// Fields whose value was replaced
    #[serde(default)]
    pub fields_updated: Vec<FieldChange>,

    /// Fields (or list members) that were removed
    #[serde(default)]
    pub fields_deleted: Vec<FieldChange>,
}

impl ChangeDescription {
    /// True when the update turned out to be a no-op
    pub fn is_empty(&self) -> bool {
        self.fields_added.is_empty()
            && self.fields_updated.is_empty()
            && self.fields_deleted.is_empty()
    }

    /// Names of all changed fields, in recording order
    pub fn changed_fields(&self) -> Vec<&str> {
        self.fields_added
            .iter()
            .chain(self.fields_updated.iter())
            .chain(self.fields_deleted.iter())
            .map(|c| c.name.as_str())
            .collect()
    }
}
