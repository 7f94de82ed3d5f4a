// 🗄️ Document Store
// Schemaless JSON documents grouped into named collections.
//
// SqliteStore keeps every collection in one `documents` table (WAL mode);
// MemoryStore is the drop-in used by tests.

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

pub const ENROLLMENTS: &str = "enrollments";
pub const CONSULTATIONS: &str = "consultations";

/// Upper bound on documents returned by a single listing
pub const LIST_LIMIT: usize = 1000;

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Minimal document-store surface the API needs: insert, find, count.
///
/// `find` returns documents in insertion order.
pub trait DocumentStore: Send + Sync {
    fn insert_one(&self, collection: &str, document: Value) -> Result<()>;

    fn find(&self, collection: &str, limit: usize) -> Result<Vec<Value>>;

    fn count_documents(&self, collection: &str) -> Result<u64>;
}

/// Serialize a record and insert it
pub fn insert_record<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    record: &T,
) -> Result<()> {
    let document = serde_json::to_value(record)
        .with_context(|| format!("Failed to serialize document for '{}'", collection))?;
    store.insert_one(collection, document)
}

/// Find documents and decode them into records
pub fn find_records<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    limit: usize,
) -> Result<Vec<T>> {
    store
        .find(collection, limit)?
        .into_iter()
        .map(|doc| {
            serde_json::from_value(doc)
                .with_context(|| format!("Malformed document in '{}'", collection))
        })
        .collect()
}

// ============================================================================
// SQLITE STORE
// ============================================================================

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and ensure the schema exists
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory {:?}", parent))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {:?}", path))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow!("database connection mutex poisoned"))?;
        f(&conn)
    }
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)",
        [],
    )?;

    Ok(())
}

impl DocumentStore for SqliteStore {
    fn insert_one(&self, collection: &str, document: Value) -> Result<()> {
        let body = serde_json::to_string(&document)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (collection, body) VALUES (?1, ?2)",
                params![collection, body],
            )
            .with_context(|| format!("Failed to insert into '{}'", collection))?;
            Ok(())
        })
    }

    fn find(&self, collection: &str, limit: usize) -> Result<Vec<Value>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT body FROM documents
                 WHERE collection = ?1
                 ORDER BY id ASC
                 LIMIT ?2",
            )?;

            let bodies = stmt
                .query_map(params![collection, limit as i64], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;

            bodies
                .iter()
                .map(|body| {
                    serde_json::from_str(body)
                        .with_context(|| format!("Corrupt JSON document in '{}'", collection))
                })
                .collect()
        })
    }

    fn count_documents(&self, collection: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM documents WHERE collection = ?1",
                [collection],
                |row| row.get(0),
            )?;
            Ok(count as u64)
        })
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn insert_one(&self, collection: &str, document: Value) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    fn find(&self, collection: &str, limit: usize) -> Result<Vec<Value>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn count_documents(&self, collection: &str) -> Result<u64> {
        let collections = self
            .collections
            .read()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(collections.get(collection).map_or(0, |docs| docs.len() as u64))
    }
}

// ============================================================================
// TESTS
// ============================================================================
