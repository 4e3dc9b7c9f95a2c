//! Typed accessor over the local and sync storage areas.
//!
//! Local holds the `Persist` keys plus the window bookkeeping (`State`). Sync
//! holds a plain `timestamp` and the rest of the `Persist` as a compact codec
//! payload. Nothing here is transactional: callers re-read before they write
//! and write the smallest key set they touched. Two contexts doing
//! read-modify-write on `workspaces` at the same time can lose one update.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::services::codec;
use crate::services::kv_store::{KeyValueStore, MemoryStore};
use crate::services::workspace_model::{is_valid_settings, is_valid_workspace, now_ms};
use crate::types::errors::StorageError;
use crate::types::persist::{
    Persist, PersistPatch, StatePatch, StorageKey, StoredData, KEY_SETTINGS, KEY_SYNC_PAYLOAD,
    KEY_TIMESTAMP, KEY_WINDOW_TABS, KEY_WORKSPACES, KEY_WORKSPACE_WINDOWS,
};

pub struct Storage {
    local: Arc<dyn KeyValueStore>,
    sync: Arc<dyn KeyValueStore>,
}

fn take<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Result<Option<T>, StorageError> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => Ok(Some(serde_json::from_value(v)?)),
    }
}

impl Storage {
    pub fn new(local: Arc<dyn KeyValueStore>, sync: Arc<dyn KeyValueStore>) -> Self {
        Self { local, sync }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::shared(), MemoryStore::shared())
    }

    /// Reads the requested local keys; `timestamp` is always included.
    pub async fn local_get(&self, keys: &[StorageKey]) -> Result<StoredData, StorageError> {
        let mut names: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
        names.push(KEY_TIMESTAMP);

        let mut raw = self.local.get(&names).await?;
        Ok(StoredData {
            timestamp: take(&mut raw, KEY_TIMESTAMP)?,
            workspaces: take(&mut raw, KEY_WORKSPACES)?,
            settings: take(&mut raw, KEY_SETTINGS)?,
            workspace_windows: take(&mut raw, KEY_WORKSPACE_WINDOWS)?,
            window_tabs: take(&mut raw, KEY_WINDOW_TABS)?,
        })
    }

    /// The local `Persist`, with defaults for keys never written.
    pub async fn local_persist(&self) -> Result<Persist, StorageError> {
        let data = self
            .local_get(&[StorageKey::Workspaces, StorageKey::Settings])
            .await?;
        Ok(Persist {
            timestamp: data.timestamp.unwrap_or(0),
            workspaces: data.workspaces.unwrap_or_default(),
            settings: data.settings.unwrap_or_default(),
        })
    }

    /// Writes the given persist keys and stamps `timestamp = now`. Returns the stamp.
    pub async fn local_persist_set(&self, patch: PersistPatch) -> Result<i64, StorageError> {
        let stamp = now_ms();
        let mut items = Map::new();
        if let Some(workspaces) = patch.workspaces {
            items.insert(KEY_WORKSPACES.to_string(), serde_json::to_value(workspaces)?);
        }
        if let Some(settings) = patch.settings {
            items.insert(KEY_SETTINGS.to_string(), serde_json::to_value(settings)?);
        }
        items.insert(KEY_TIMESTAMP.to_string(), Value::from(stamp));
        self.local.set(items).await?;
        Ok(stamp)
    }

    /// Writes window bookkeeping. Not stamped: it never leaves this device.
    pub async fn local_state_set(&self, patch: StatePatch) -> Result<(), StorageError> {
        let mut items = Map::new();
        if let Some(windows) = patch.workspace_windows {
            items.insert(KEY_WORKSPACE_WINDOWS.to_string(), serde_json::to_value(windows)?);
        }
        if let Some(tabs) = patch.window_tabs {
            items.insert(KEY_WINDOW_TABS.to_string(), serde_json::to_value(tabs)?);
        }
        if items.is_empty() {
            return Ok(());
        }
        self.local.set(items).await
    }

    /// Reads the sync area. Missing, undecodable or structurally invalid payloads are `None`.
    pub async fn sync_get(&self) -> Result<Option<Persist>, StorageError> {
        let mut raw = self.sync.get(&[KEY_TIMESTAMP, KEY_SYNC_PAYLOAD]).await?;
        let timestamp: Option<i64> = take(&mut raw, KEY_TIMESTAMP)?;
        let payload: Option<String> = take(&mut raw, KEY_SYNC_PAYLOAD)?;

        let Some(payload) = payload else {
            return Ok(None);
        };
        let Some(mut persist) = codec::decompress(&payload) else {
            warn!("Sync payload could not be decoded, ignoring it");
            return Ok(None);
        };

        let as_json = serde_json::to_value(&persist)?;
        let workspaces_ok = as_json[KEY_WORKSPACES]
            .as_array()
            .map_or(false, |list| list.iter().all(is_valid_workspace));
        if !workspaces_ok || !is_valid_settings(&as_json[KEY_SETTINGS]) {
            warn!("Sync payload failed validation, ignoring it");
            return Ok(None);
        }

        if let Some(ts) = timestamp {
            persist.timestamp = ts;
        }
        Ok(Some(persist))
    }

    /// Copies `persist` to the sync area, stamping a fresh timestamp. Returns the stamp.
    pub async fn sync_set(&self, mut persist: Persist) -> Result<i64, StorageError> {
        let stamp = now_ms();
        persist.timestamp = stamp;
        let payload =
            codec::compress(&persist).map_err(|e| StorageError::SerializationError(e.to_string()))?;

        let mut items = Map::new();
        items.insert(KEY_TIMESTAMP.to_string(), Value::from(stamp));
        items.insert(KEY_SYNC_PAYLOAD.to_string(), Value::String(payload));
        self.sync.set(items).await?;
        Ok(stamp)
    }
}
