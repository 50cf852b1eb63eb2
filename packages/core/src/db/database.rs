//! Database Connection Management
//!
//! This module provides the core database connection and initialization
//! functionality using libsql for Glossarium's relational substrate.
//!
//! # Architecture
//!
//! - **Path-agnostic**: Accepts any valid PathBuf
//! - **Idempotent schema**: CREATE TABLE IF NOT EXISTS, safe on every start
//! - **WAL mode**: Write-Ahead Logging for better concurrency
//! - **Foreign keys**: Enabled for referential integrity
//!
//! # Database Connection Patterns
//!
//! **Always use `connect_with_timeout()` in async functions** so concurrent
//! operations wait and retry instead of failing immediately with
//! `SQLITE_BUSY` when the Tokio runtime interleaves writers.
//!
//! # Schema
//!
//! Three tables back the engine:
//!
//! - `entities` - one row per entity of any type; the body column holds the
//!   serialized persisted record, the `fqn` column is the name-keyed lookup
//!   and bulk-rename target
//! - `entity_relationship` - one row per typed edge, with a bidirectional
//!   flag consulted by the query path
//! - `tag_usage` - name-keyed classification-tag attachments

use crate::db::error::DatabaseError;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;

/// Database service managing the libsql connection and schema
///
/// # Examples
///
/// ```no_run
/// use glossarium_core::db::DatabaseService;
/// use std::path::PathBuf;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db_path = PathBuf::from("/path/to/glossarium.db");
///     let db_service = DatabaseService::new(db_path).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

impl DatabaseService {
    /// Create a new DatabaseService with the specified database path
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Initialize the schema (CREATE TABLE IF NOT EXISTS)
    /// 4. Enable SQLite features (WAL mode, foreign keys)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if:
    /// - Parent directory cannot be created
    /// - Database connection fails
    /// - Schema initialization fails
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        let is_new_database = !db_path.exists();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DatabaseError::DirectoryCreationFailed)?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema(is_new_database).await?;

        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so we must use query() instead of
    /// execute(). This helper encapsulates that pattern.
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Initialize database schema and configuration
    ///
    /// Creates tables and indexes using CREATE TABLE IF NOT EXISTS,
    /// ensuring idempotent initialization (safe to call multiple times).
    ///
    /// # Arguments
    ///
    /// * `is_new_database` - Whether this is a newly created database file.
    ///   If true, performs a WAL checkpoint to flush schema to disk so a
    ///   fresh database is immediately visible to other connections.
    async fn initialize_schema(&self, is_new_database: bool) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        // WAL mode for better concurrency
        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        // Wait up to 5s instead of failing immediately on lock
        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;

        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        // One row per entity of any type. The body column carries the
        // serialized persisted record; relationship-valued fields are never
        // part of it.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS entities (
                id TEXT PRIMARY KEY,
                entity_type TEXT NOT NULL,
                name TEXT NOT NULL,
                fqn TEXT NOT NULL UNIQUE,
                body JSON NOT NULL DEFAULT '{}',
                version INTEGER NOT NULL DEFAULT 1,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                modified_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create entities table: {}", e))
        })?;

        // One row per typed edge. Bidirectional kinds stay a single row with
        // the flag set; the query path consults the flag instead of
        // materializing a mirror row.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS entity_relationship (
                from_id TEXT NOT NULL,
                from_type TEXT NOT NULL,
                to_id TEXT NOT NULL,
                to_type TEXT NOT NULL,
                relation TEXT NOT NULL,
                bidirectional INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (from_id, to_id, relation)
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create entity_relationship table: {}",
                e
            ))
        })?;

        // Name-keyed tag attachments: tag_fqn labels target_fqn. Both columns
        // participate in cascade rename.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS tag_usage (
                tag_fqn TEXT NOT NULL,
                target_fqn TEXT NOT NULL,
                source TEXT NOT NULL DEFAULT 'classification',
                PRIMARY KEY (tag_fqn, target_fqn)
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create tag_usage table: {}", e))
        })?;

        self.create_core_indexes(&conn).await?;

        // Flush schema to disk for newly created databases so rapid
        // open/close cycles in tests never observe missing tables.
        if is_new_database {
            self.execute_pragma(&conn, "PRAGMA wal_checkpoint(TRUNCATE)")
                .await?;
        }

        Ok(())
    }

    /// Create core indexes
    ///
    /// These never change; no ALTER TABLE is ever required on user machines.
    async fn create_core_indexes(&self, conn: &libsql::Connection) -> Result<(), DatabaseError> {
        // Entity lookups by type (listing terms, glossaries)
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_entities_type ON entities(entity_type)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create index 'idx_entities_type': {}",
                e
            ))
        })?;

        // Prefix scans during cascade rename
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_entities_fqn ON entities(fqn)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to create index 'idx_entities_fqn': {}", e))
        })?;

        // Edge queries from either side
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_relationship_from ON entity_relationship(from_id, relation)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create index 'idx_relationship_from': {}",
                e
            ))
        })?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_relationship_to ON entity_relationship(to_id, relation)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create index 'idx_relationship_to': {}",
                e
            ))
        })?;

        // Usage counts and rename scans over tag attachments
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tag_usage_tag ON tag_usage(tag_fqn)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create index 'idx_tag_usage_tag': {}",
                e
            ))
        })?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tag_usage_target ON tag_usage(target_fqn)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to create index 'idx_tag_usage_target': {}",
                e
            ))
        })?;

        Ok(())
    }

    /// Get a synchronous connection to the database
    ///
    /// Only use this in synchronous, single-threaded contexts. In async
    /// functions use `connect_with_timeout()` instead.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::LibsqlError)
    }

    /// Get an async connection with busy timeout configured
    ///
    /// The safe default for async call sites: the 5-second busy timeout makes
    /// concurrent operations serialize gracefully instead of failing when the
    /// database is locked.
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;
        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_schema_initialization_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let first = DatabaseService::new(db_path.clone()).await.unwrap();
        drop(first);

        // Reopening an existing file re-runs schema init without error
        let second = DatabaseService::new(db_path).await.unwrap();
        let conn = second.connect_with_timeout().await.unwrap();
        let mut rows = conn
            .query(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'entities'",
                (),
            )
            .await
            .unwrap();
        assert!(rows.next().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested/dir/test.db");

        let service = DatabaseService::new(db_path.clone()).await.unwrap();
        assert!(db_path.exists());
        drop(service);
    }
}
