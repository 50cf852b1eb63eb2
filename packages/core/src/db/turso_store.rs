//! TursoStore - CatalogStore Implementation for libsql
//!
//! Thin implementation of the `CatalogStore` trait over `DatabaseService`.
//! All business rules live in the service layer; this module only speaks SQL
//! and converts rows into model values.

use crate::db::catalog_store::{CatalogStore, EntityRow};
use crate::db::error::DatabaseError;
use crate::db::DatabaseService;
use crate::models::{EntityReference, EntityType, RelationshipKind, TagLabel};
use anyhow::Result;
use async_trait::async_trait;
use libsql::Row;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// libsql-backed catalog store
pub struct TursoStore {
    /// Underlying database service (connection + schema management)
    db: Arc<DatabaseService>,
}

impl TursoStore {
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Convert an `entities` row to an `EntityRow`
    ///
    /// Expected columns (in order): id, entity_type, name, fqn, body, version
    fn row_to_entity(row: &Row) -> Result<EntityRow, DatabaseError> {
        let id: String = row
            .get(0)
            .map_err(|e| DatabaseError::row_decode(format!("id: {}", e)))?;
        let entity_type: String = row
            .get(1)
            .map_err(|e| DatabaseError::row_decode(format!("entity_type: {}", e)))?;
        let name: String = row
            .get(2)
            .map_err(|e| DatabaseError::row_decode(format!("name: {}", e)))?;
        let fqn: String = row
            .get(3)
            .map_err(|e| DatabaseError::row_decode(format!("fqn: {}", e)))?;
        let body: String = row
            .get(4)
            .map_err(|e| DatabaseError::row_decode(format!("body: {}", e)))?;
        let version: i64 = row
            .get(5)
            .map_err(|e| DatabaseError::row_decode(format!("version: {}", e)))?;

        Ok(EntityRow {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::row_decode(format!("id '{}': {}", id, e)))?,
            entity_type: EntityType::from_str(&entity_type).map_err(DatabaseError::row_decode)?,
            name,
            fqn,
            body: serde_json::from_str(&body)
                .map_err(|e| DatabaseError::row_decode(format!("body: {}", e)))?,
            version,
        })
    }

    /// Convert an edge-query row (joined against `entities`) to a reference.
    ///
    /// Expected columns: other_id, entity id (nullable), entity_type, name,
    /// fqn. A NULL entity id means the edge is dangling; the caller gets
    /// `None` and decides how to report it.
    fn row_to_reference(row: &Row) -> Result<(Uuid, Option<EntityReference>), DatabaseError> {
        let other_id: String = row
            .get(0)
            .map_err(|e| DatabaseError::row_decode(format!("other_id: {}", e)))?;
        let other_id = Uuid::parse_str(&other_id)
            .map_err(|e| DatabaseError::row_decode(format!("other_id '{}': {}", other_id, e)))?;

        let joined_id = row
            .get_value(1)
            .map_err(|e| DatabaseError::row_decode(format!("joined id: {}", e)))?;
        if matches!(joined_id, libsql::Value::Null) {
            return Ok((other_id, None));
        }

        let entity_type: String = row
            .get(2)
            .map_err(|e| DatabaseError::row_decode(format!("entity_type: {}", e)))?;
        let name: String = row
            .get(3)
            .map_err(|e| DatabaseError::row_decode(format!("name: {}", e)))?;
        let fqn: String = row
            .get(4)
            .map_err(|e| DatabaseError::row_decode(format!("fqn: {}", e)))?;

        let reference = EntityReference::new(
            other_id,
            EntityType::from_str(&entity_type).map_err(DatabaseError::row_decode)?,
        )
        .with_name(name)
        .with_fqn(fqn);
        Ok((other_id, Some(reference)))
    }

    /// Run an edge query and collect resolved references, skipping dangling
    /// targets with a warning.
    async fn query_references(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<EntityReference>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;
        let mut stmt = conn.prepare(sql).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to prepare edge query: {}", e))
        })?;
        let mut rows = stmt.query(params).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute edge query: {}", e))
        })?;

        let mut references = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            match Self::row_to_reference(&row)? {
                (_, Some(reference)) => references.push(reference),
                (other_id, None) => {
                    // Dangling edge: target was deleted without edge cleanup.
                    // Tolerated on read, the edge simply does not resolve.
                    tracing::warn!(target_id = %other_id, "Skipping dangling relationship edge");
                }
            }
        }
        Ok(references)
    }
}

#[async_trait]
impl CatalogStore for TursoStore {
    async fn store_entity(&self, row: EntityRow, is_update: bool) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        let body = row.body.to_string();

        if is_update {
            let changed = conn
                .execute(
                    "UPDATE entities
                     SET name = ?, fqn = ?, body = ?, version = ?, modified_at = CURRENT_TIMESTAMP
                     WHERE id = ?",
                    (
                        row.name.as_str(),
                        row.fqn.as_str(),
                        body.as_str(),
                        row.version,
                        row.id.to_string(),
                    ),
                )
                .await
                .map_err(|e| {
                    DatabaseError::sql_execution(format!("Failed to update entity: {}", e))
                })?;
            if changed == 0 {
                return Err(
                    DatabaseError::sql_execution(format!("No entity row for id {}", row.id)).into(),
                );
            }
        } else {
            conn.execute(
                "INSERT INTO entities (id, entity_type, name, fqn, body, version)
                 VALUES (?, ?, ?, ?, ?, ?)",
                (
                    row.id.to_string(),
                    row.entity_type.to_string(),
                    row.name.as_str(),
                    row.fqn.as_str(),
                    body.as_str(),
                    row.version,
                ),
            )
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert entity: {}", e)))?;
        }
        Ok(())
    }

    async fn get_entity(&self, id: Uuid) -> Result<Option<EntityRow>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut stmt = conn
            .prepare(
                "SELECT id, entity_type, name, fqn, body, version FROM entities WHERE id = ?",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare get_entity query: {}", e))
            })?;
        let mut rows = stmt.query([id.to_string()]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute get_entity query: {}", e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::row_to_entity(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_entity_by_fqn(&self, fqn: &str) -> Result<Option<EntityRow>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut stmt = conn
            .prepare(
                "SELECT id, entity_type, name, fqn, body, version FROM entities WHERE fqn = ?",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare fqn query: {}", e))
            })?;
        let mut rows = stmt.query([fqn]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute fqn query: {}", e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::row_to_entity(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_entity(&self, id: Uuid) -> Result<bool> {
        let conn = self.db.connect_with_timeout().await?;
        let deleted = conn
            .execute("DELETE FROM entities WHERE id = ?", [id.to_string()])
            .await
            .map_err(|e| DatabaseError::sql_execution(format!("Failed to delete entity: {}", e)))?;
        Ok(deleted > 0)
    }

    async fn add_edge(
        &self,
        from: &EntityReference,
        to: &EntityReference,
        kind: RelationshipKind,
        bidirectional: bool,
    ) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "INSERT OR REPLACE INTO entity_relationship
             (from_id, from_type, to_id, to_type, relation, bidirectional)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                from.id.to_string(),
                from.entity_type.to_string(),
                to.id.to_string(),
                to.entity_type.to_string(),
                kind.to_string(),
                bidirectional as i64,
            ),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to add edge: {}", e)))?;
        Ok(())
    }

    async fn delete_edge(&self, from_id: Uuid, to_id: Uuid, kind: RelationshipKind) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        // Bidirectional rows match in either orientation
        conn.execute(
            "DELETE FROM entity_relationship
             WHERE relation = ?1
               AND ((from_id = ?2 AND to_id = ?3)
                    OR (bidirectional = 1 AND from_id = ?3 AND to_id = ?2))",
            (kind.to_string(), from_id.to_string(), to_id.to_string()),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to delete edge: {}", e)))?;
        Ok(())
    }

    async fn find_from(
        &self,
        id: Uuid,
        from_type: EntityType,
        kind: RelationshipKind,
        to_type: EntityType,
    ) -> Result<Vec<EntityReference>> {
        let references = self
            .query_references(
                "SELECT r.to_id, e.id, e.entity_type, e.name, e.fqn
                 FROM entity_relationship r
                 LEFT JOIN entities e ON e.id = r.to_id
                 WHERE r.from_id = ? AND r.from_type = ? AND r.relation = ? AND r.to_type = ?
                 ORDER BY e.fqn",
                vec![
                    id.to_string().into(),
                    from_type.to_string().into(),
                    kind.to_string().into(),
                    to_type.to_string().into(),
                ],
            )
            .await?;
        Ok(references)
    }

    async fn find_to(
        &self,
        id: Uuid,
        to_type: EntityType,
        kind: RelationshipKind,
        from_type: EntityType,
    ) -> Result<Vec<EntityReference>> {
        let references = self
            .query_references(
                "SELECT r.from_id, e.id, e.entity_type, e.name, e.fqn
                 FROM entity_relationship r
                 LEFT JOIN entities e ON e.id = r.from_id
                 WHERE r.to_id = ? AND r.to_type = ? AND r.relation = ? AND r.from_type = ?
                 ORDER BY e.fqn",
                vec![
                    id.to_string().into(),
                    to_type.to_string().into(),
                    kind.to_string().into(),
                    from_type.to_string().into(),
                ],
            )
            .await?;
        Ok(references)
    }

    async fn find_both(
        &self,
        id: Uuid,
        entity_type: EntityType,
        kind: RelationshipKind,
        other_type: EntityType,
    ) -> Result<Vec<EntityReference>> {
        let outgoing = self.find_from(id, entity_type, kind, other_type).await?;
        let incoming = self
            .query_references(
                "SELECT r.from_id, e.id, e.entity_type, e.name, e.fqn
                 FROM entity_relationship r
                 LEFT JOIN entities e ON e.id = r.from_id
                 WHERE r.to_id = ? AND r.to_type = ? AND r.relation = ? AND r.from_type = ?
                   AND r.bidirectional = 1
                 ORDER BY e.fqn",
                vec![
                    id.to_string().into(),
                    entity_type.to_string().into(),
                    kind.to_string().into(),
                    other_type.to_string().into(),
                ],
            )
            .await?;

        let mut references = outgoing;
        for candidate in incoming {
            if !references.iter().any(|r| r.same_entity(&candidate)) {
                references.push(candidate);
            }
        }
        Ok(references)
    }

    async fn update_fqn_prefix(&self, old_fqn: &str, new_fqn: &str) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        // Exact substring match instead of LIKE: FQNs may legitimately
        // contain '%' or '_', which a LIKE pattern would treat as wildcards.
        let rewritten = conn
            .execute(
                "UPDATE entities
                 SET fqn = ?2 || substr(fqn, length(?1) + 1),
                     body = json_set(body, '$.fullyQualifiedName',
                                     ?2 || substr(fqn, length(?1) + 1)),
                     modified_at = CURRENT_TIMESTAMP
                 WHERE fqn = ?1 OR substr(fqn, 1, length(?1) + 1) = ?1 || '.'",
                (old_fqn, new_fqn),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to rewrite fqn prefix: {}", e))
            })?;
        Ok(rewritten)
    }

    async fn add_tag_label(&self, label: &TagLabel, target_fqn: &str) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "INSERT OR REPLACE INTO tag_usage (tag_fqn, target_fqn, source) VALUES (?, ?, ?)",
            (label.tag_fqn.as_str(), target_fqn, label.source.as_str()),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to add tag label: {}", e)))?;
        Ok(())
    }

    async fn delete_tag_label(&self, tag_fqn: &str, target_fqn: &str) -> Result<()> {
        let conn = self.db.connect_with_timeout().await?;
        conn.execute(
            "DELETE FROM tag_usage WHERE tag_fqn = ? AND target_fqn = ?",
            (tag_fqn, target_fqn),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to delete tag label: {}", e)))?;
        Ok(())
    }

    async fn target_tag_labels(&self, target_fqn: &str) -> Result<Vec<TagLabel>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut stmt = conn
            .prepare("SELECT tag_fqn, source FROM tag_usage WHERE target_fqn = ? ORDER BY tag_fqn")
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare tag label query: {}", e))
            })?;
        let mut rows = stmt.query([target_fqn]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute tag label query: {}", e))
        })?;

        let mut labels = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            let tag_fqn: String = row
                .get(0)
                .map_err(|e| DatabaseError::row_decode(format!("tag_fqn: {}", e)))?;
            let source: String = row
                .get(1)
                .map_err(|e| DatabaseError::row_decode(format!("source: {}", e)))?;
            labels.push(TagLabel { tag_fqn, source });
        }
        Ok(labels)
    }

    async fn count_tag_usages(&self, fqn: &str) -> Result<i64> {
        let conn = self.db.connect_with_timeout().await?;
        let mut stmt = conn
            .prepare("SELECT COUNT(*) FROM tag_usage WHERE tag_fqn = ?")
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare tag count query: {}", e))
            })?;
        let mut rows = stmt.query([fqn]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute tag count query: {}", e))
        })?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
            .ok_or_else(|| DatabaseError::sql_execution("COUNT(*) returned no row"))?;
        let count: i64 = row
            .get(0)
            .map_err(|e| DatabaseError::row_decode(format!("count: {}", e)))?;
        Ok(count)
    }

    async fn delete_tag_labels(&self, fqn: &str) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        let deleted = conn
            .execute("DELETE FROM tag_usage WHERE tag_fqn = ?", [fqn])
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to delete tag labels: {}", e))
            })?;
        Ok(deleted)
    }

    async fn rename_tag_targets(&self, old_fqn: &str, new_fqn: &str) -> Result<u64> {
        let conn = self.db.connect_with_timeout().await?;
        let tags = conn
            .execute(
                "UPDATE tag_usage
                 SET tag_fqn = ?2 || substr(tag_fqn, length(?1) + 1)
                 WHERE tag_fqn = ?1 OR substr(tag_fqn, 1, length(?1) + 1) = ?1 || '.'",
                (old_fqn, new_fqn),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to rename tag fqns: {}", e))
            })?;
        let targets = conn
            .execute(
                "UPDATE tag_usage
                 SET target_fqn = ?2 || substr(target_fqn, length(?1) + 1)
                 WHERE target_fqn = ?1 OR substr(target_fqn, 1, length(?1) + 1) = ?1 || '.'",
                (old_fqn, new_fqn),
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to rename tag targets: {}", e))
            })?;
        Ok(tags + targets)
    }

    async fn tag_target_fqns(&self, tag_fqn: &str) -> Result<Vec<String>> {
        let conn = self.db.connect_with_timeout().await?;
        let mut stmt = conn
            .prepare("SELECT target_fqn FROM tag_usage WHERE tag_fqn = ? ORDER BY target_fqn")
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare tag target query: {}", e))
            })?;
        let mut rows = stmt.query([tag_fqn]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute tag target query: {}", e))
        })?;

        let mut targets = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            let target: String = row
                .get(0)
                .map_err(|e| DatabaseError::row_decode(format!("target_fqn: {}", e)))?;
            targets.push(target);
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn create_test_store() -> (TursoStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(DatabaseService::new(db_path).await.unwrap());
        (TursoStore::new(db), temp_dir)
    }

    fn term_row(name: &str, fqn: &str) -> EntityRow {
        EntityRow::new(
            Uuid::new_v4(),
            EntityType::GlossaryTerm,
            name,
            fqn,
            json!({ "fullyQualifiedName": fqn }),
        )
    }

    #[tokio::test]
    async fn test_entity_round_trip() {
        let (store, _temp) = create_test_store().await;

        let row = term_row("Revenue", "Finance.Revenue");
        store.store_entity(row.clone(), false).await.unwrap();

        let fetched = store.get_entity(row.id).await.unwrap().unwrap();
        assert_eq!(fetched, row);

        let by_fqn = store.get_entity_by_fqn("Finance.Revenue").await.unwrap();
        assert_eq!(by_fqn.unwrap().id, row.id);
    }

    #[tokio::test]
    async fn test_add_edge_is_idempotent() {
        let (store, _temp) = create_test_store().await;

        let a = term_row("A", "G.A");
        let b = term_row("B", "G.B");
        store.store_entity(a.clone(), false).await.unwrap();
        store.store_entity(b.clone(), false).await.unwrap();

        let a_ref = a.entity_reference();
        let b_ref = b.entity_reference();
        store
            .add_edge(&a_ref, &b_ref, RelationshipKind::RelatedTo, true)
            .await
            .unwrap();
        store
            .add_edge(&a_ref, &b_ref, RelationshipKind::RelatedTo, true)
            .await
            .unwrap();

        let related = store
            .find_both(
                a.id,
                EntityType::GlossaryTerm,
                RelationshipKind::RelatedTo,
                EntityType::GlossaryTerm,
            )
            .await
            .unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, b.id);
    }

    #[tokio::test]
    async fn test_bidirectional_edge_answers_both_sides() {
        let (store, _temp) = create_test_store().await;

        let a = term_row("A", "G.A");
        let b = term_row("B", "G.B");
        store.store_entity(a.clone(), false).await.unwrap();
        store.store_entity(b.clone(), false).await.unwrap();

        store
            .add_edge(
                &a.entity_reference(),
                &b.entity_reference(),
                RelationshipKind::RelatedTo,
                true,
            )
            .await
            .unwrap();

        let from_a = store
            .find_both(
                a.id,
                EntityType::GlossaryTerm,
                RelationshipKind::RelatedTo,
                EntityType::GlossaryTerm,
            )
            .await
            .unwrap();
        let from_b = store
            .find_both(
                b.id,
                EntityType::GlossaryTerm,
                RelationshipKind::RelatedTo,
                EntityType::GlossaryTerm,
            )
            .await
            .unwrap();

        assert_eq!(from_a.len(), 1);
        assert_eq!(from_a[0].id, b.id);
        assert_eq!(from_b.len(), 1);
        assert_eq!(from_b[0].id, a.id);
    }

    #[tokio::test]
    async fn test_delete_edge_matches_either_orientation() {
        let (store, _temp) = create_test_store().await;

        let a = term_row("A", "G.A");
        let b = term_row("B", "G.B");
        store.store_entity(a.clone(), false).await.unwrap();
        store.store_entity(b.clone(), false).await.unwrap();

        store
            .add_edge(
                &a.entity_reference(),
                &b.entity_reference(),
                RelationshipKind::RelatedTo,
                true,
            )
            .await
            .unwrap();

        // Delete from the other side of the stored row
        store
            .delete_edge(b.id, a.id, RelationshipKind::RelatedTo)
            .await
            .unwrap();

        let remaining = store
            .find_both(
                a.id,
                EntityType::GlossaryTerm,
                RelationshipKind::RelatedTo,
                EntityType::GlossaryTerm,
            )
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn test_dangling_edge_is_skipped() {
        let (store, _temp) = create_test_store().await;

        let a = term_row("A", "G.A");
        let b = term_row("B", "G.B");
        store.store_entity(a.clone(), false).await.unwrap();
        store.store_entity(b.clone(), false).await.unwrap();

        store
            .add_edge(
                &a.entity_reference(),
                &b.entity_reference(),
                RelationshipKind::RelatedTo,
                true,
            )
            .await
            .unwrap();

        // Delete the target without cleaning up the edge
        store.delete_entity(b.id).await.unwrap();

        let related = store
            .find_both(
                a.id,
                EntityType::GlossaryTerm,
                RelationshipKind::RelatedTo,
                EntityType::GlossaryTerm,
            )
            .await
            .unwrap();
        assert!(related.is_empty());
    }

    #[tokio::test]
    async fn test_update_fqn_prefix_rewrites_descendants_only() {
        let (store, _temp) = create_test_store().await;

        let parent = term_row("Revenue", "Finance.Revenue");
        let child = term_row("GrossRevenue", "Finance.Revenue.GrossRevenue");
        let bystander = term_row("RevenueTax", "Finance.RevenueTax");
        store.store_entity(parent.clone(), false).await.unwrap();
        store.store_entity(child.clone(), false).await.unwrap();
        store.store_entity(bystander.clone(), false).await.unwrap();

        let rewritten = store
            .update_fqn_prefix("Finance.Revenue", "Finance.Income")
            .await
            .unwrap();
        assert_eq!(rewritten, 2);

        let child_after = store.get_entity(child.id).await.unwrap().unwrap();
        assert_eq!(child_after.fqn, "Finance.Income.GrossRevenue");
        assert_eq!(
            child_after.body["fullyQualifiedName"],
            "Finance.Income.GrossRevenue"
        );

        // "Finance.RevenueTax" is not a dotted descendant and stays put
        let bystander_after = store.get_entity(bystander.id).await.unwrap().unwrap();
        assert_eq!(bystander_after.fqn, "Finance.RevenueTax");

        // Second invocation matches nothing
        let again = store
            .update_fqn_prefix("Finance.Revenue", "Finance.Income")
            .await
            .unwrap();
        assert_eq!(again, 0);
    }

    #[tokio::test]
    async fn test_update_fqn_prefix_treats_sql_wildcards_literally() {
        let (store, _temp) = create_test_store().await;

        let wildcard = term_row("100%", "Finance.100%");
        let wildcard_child = term_row("Child", "Finance.100%.Child");
        let bystander = term_row("Child", "Finance.100x.Child");
        store.store_entity(wildcard.clone(), false).await.unwrap();
        store
            .store_entity(wildcard_child.clone(), false)
            .await
            .unwrap();
        store.store_entity(bystander.clone(), false).await.unwrap();

        let rewritten = store
            .update_fqn_prefix("Finance.100%", "Finance.Pct")
            .await
            .unwrap();
        assert_eq!(rewritten, 2);

        let child_after = store.get_entity(wildcard_child.id).await.unwrap().unwrap();
        assert_eq!(child_after.fqn, "Finance.Pct.Child");

        // '%' and '_' in the prefix must not act as wildcards
        let bystander_after = store.get_entity(bystander.id).await.unwrap().unwrap();
        assert_eq!(bystander_after.fqn, "Finance.100x.Child");
    }

    #[tokio::test]
    async fn test_rename_tag_targets_treats_sql_wildcards_literally() {
        let (store, _temp) = create_test_store().await;

        let wildcard_label = TagLabel {
            tag_fqn: "Finance.100%".to_string(),
            source: "glossary".to_string(),
        };
        let bystander_label = TagLabel {
            tag_fqn: "Finance.100x".to_string(),
            source: "glossary".to_string(),
        };
        store
            .add_tag_label(&wildcard_label, "warehouse.orders.pct")
            .await
            .unwrap();
        store
            .add_tag_label(&bystander_label, "warehouse.orders.x")
            .await
            .unwrap();

        store
            .rename_tag_targets("Finance.100%", "Finance.Pct")
            .await
            .unwrap();

        assert_eq!(store.count_tag_usages("Finance.Pct").await.unwrap(), 1);
        assert_eq!(store.count_tag_usages("Finance.100x").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_tag_usage_lifecycle() {
        let (store, _temp) = create_test_store().await;

        let label = TagLabel {
            tag_fqn: "Finance.Revenue".to_string(),
            source: "glossary".to_string(),
        };
        store.add_tag_label(&label, "db.table.column").await.unwrap();
        store.add_tag_label(&label, "db.table.other").await.unwrap();

        assert_eq!(store.count_tag_usages("Finance.Revenue").await.unwrap(), 2);
        assert_eq!(
            store.tag_target_fqns("Finance.Revenue").await.unwrap(),
            vec!["db.table.column".to_string(), "db.table.other".to_string()]
        );

        store
            .rename_tag_targets("Finance.Revenue", "Finance.Income")
            .await
            .unwrap();
        assert_eq!(store.count_tag_usages("Finance.Revenue").await.unwrap(), 0);
        assert_eq!(store.count_tag_usages("Finance.Income").await.unwrap(), 2);

        let deleted = store.delete_tag_labels("Finance.Income").await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.count_tag_usages("Finance.Income").await.unwrap(), 0);
    }
}
