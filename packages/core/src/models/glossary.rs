//! Glossary Data Structures
//!
//! A glossary is the top-level container a term hierarchy belongs to. Its FQN
//! is its name (glossaries never nest), and its reviewers are stored as
//! `Reviews` edges so terms can inherit them at create time.

use crate::models::entity_ref::{EntityReference, EntityType};
use crate::models::term::{ProviderType, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_version() -> i64 {
    1
}

/// Persisted body of a glossary. Reviewers live as edges, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryRecord {
    pub id: Uuid,
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Equal to `name`; kept explicit so every stored entity carries an FQN
    pub fully_qualified_name: String,

    pub provider: ProviderType,

    #[serde(default = "default_version")]
    pub version: i64,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Presentation value of a glossary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Glossary {
    pub id: Uuid,
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_qualified_name: Option<String>,

    /// Default reviewers inherited by terms created without their own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewers: Option<Vec<EntityReference>>,

    pub provider: ProviderType,
}

impl Glossary {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            fully_qualified_name: Some(name.clone()),
            name,
            description: String::new(),
            reviewers: None,
            provider: ProviderType::User,
        }
    }

    pub fn with_reviewers(mut self, reviewers: Vec<EntityReference>) -> Self {
        self.reviewers = Some(reviewers);
        self
    }

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
        Ok(())
    }

    pub fn to_record(
        &self,
        version: i64,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> GlossaryRecord {
        GlossaryRecord {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            fully_qualified_name: self.name.clone(),
            provider: self.provider,
            version,
            created_at,
            modified_at,
        }
    }

    pub fn from_record(record: GlossaryRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            fully_qualified_name: Some(record.fully_qualified_name),
            reviewers: None,
            provider: record.provider,
        }
    }

    pub fn entity_reference(&self) -> EntityReference {
        EntityReference::new(self.id, EntityType::Glossary)
            .with_name(self.name.clone())
            .with_fqn(self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fqn_equals_name() {
        let glossary = Glossary::new("Finance");
        assert_eq!(glossary.fully_qualified_name.as_deref(), Some("Finance"));
        assert_eq!(
            glossary.entity_reference().fully_qualified_name.as_deref(),
            Some("Finance")
        );
    }

    #[test]
    fn test_record_round_trip_drops_reviewers() {
        let now = Utc::now();
        let glossary = Glossary::new("Finance").with_reviewers(vec![EntityReference::new(
            Uuid::new_v4(),
            EntityType::User,
        )]);
        let record = glossary.to_record(1, now, now);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("reviewers").is_none());

        let loaded = Glossary::from_record(record);
        assert!(loaded.reviewers.is_none());
        assert_eq!(loaded.name, "Finance");
    }
}
