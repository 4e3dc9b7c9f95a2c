//! Key/value backends for the local and sync storage areas.
//!
//! Both areas hold JSON values under string keys. Writes are plain puts: there
//! is no transaction spanning several keys or several calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::params;
use serde_json::{Map, Value};

use crate::database::connection::Database;
use crate::types::errors::StorageError;

/// A storage area ("local" or "sync").
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the values present for `keys`; absent keys are simply missing.
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StorageError>;
    /// Writes every entry of `items`, replacing previous values.
    async fn set(&self, items: Map<String, Value>) -> Result<(), StorageError>;
    /// Removes every key of the area.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Which partition of the SQLite table a store reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreArea {
    Local,
    Sync,
}

impl StoreArea {
    fn as_str(self) -> &'static str {
        match self {
            StoreArea::Local => "local",
            StoreArea::Sync => "sync",
        }
    }
}

/// In-memory area, used by tests and ephemeral hosts.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<dyn KeyValueStore> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StorageError> {
        let items = self
            .items
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(keys
            .iter()
            .filter_map(|k| items.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, new_items: Map<String, Value>) -> Result<(), StorageError> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        items.extend(new_items);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.items
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
            .clear();
        Ok(())
    }
}

/// Area persisted in the `kv_store` SQLite table.
pub struct SqliteStore {
    db: Arc<Database>,
    area: StoreArea,
}

impl SqliteStore {
    pub fn new(db: Arc<Database>, area: StoreArea) -> Self {
        Self { db, area }
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, keys: &[&str]) -> Result<Map<String, Value>, StorageError> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE area = ?1 AND key = ?2")?;

        let mut out = Map::new();
        for key in keys {
            let row: Result<String, rusqlite::Error> =
                stmt.query_row(params![self.area.as_str(), key], |row| row.get(0));
            match row {
                Ok(text) => {
                    out.insert(key.to_string(), serde_json::from_str(&text)?);
                }
                Err(rusqlite::Error::QueryReturnedNoRows) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(out)
    }

    async fn set(&self, items: Map<String, Value>) -> Result<(), StorageError> {
        let now = chrono::Utc::now().timestamp_millis();
        let mut conn = self.db.connection();
        let tx = conn.transaction()?;
        for (key, value) in items {
            let text = serde_json::to_string(&value)?;
            tx.execute(
                "INSERT INTO kv_store (area, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(area, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![self.area.as_str(), key, text, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.db
            .connection()
            .execute("DELETE FROM kv_store WHERE area = ?1", params![self.area.as_str()])?;
        Ok(())
    }
}
