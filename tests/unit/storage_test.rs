//! Unit tests for the storage accessor over memory and SQLite backends.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tempfile::TempDir;

use tabspace::database::Database;
use tabspace::services::codec;
use tabspace::services::kv_store::{KeyValueStore, MemoryStore, SqliteStore, StoreArea};
use tabspace::services::storage::Storage;
use tabspace::types::persist::{Persist, PersistPatch, State, StatePatch, StorageKey};
use tabspace::types::settings::{Settings, SyncMode, ThemeMode};
use tabspace::types::workspace::Workspace;

fn workspace(id: &str) -> Workspace {
    Workspace {
        id: id.to_string(),
        name: id.to_uppercase(),
        color: "#2ea44f".to_string(),
        tabs: Vec::new(),
        created_at: 1,
        last_opened: 0,
        window_id: None,
        password: String::new(),
        passpeek: String::new(),
        failed_attempts: None,
        lock_until: None,
    }
}

fn items(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[tokio::test]
async fn test_fresh_store_reads_empty() {
    let storage = Storage::in_memory();
    let data = storage
        .local_get(&[StorageKey::Workspaces, StorageKey::Settings])
        .await
        .unwrap();
    assert!(data.timestamp.is_none());
    assert!(data.workspaces.is_none());

    let persist = storage.local_persist().await.unwrap();
    assert_eq!(persist, Persist::default());
    assert!(storage.sync_get().await.unwrap().is_none());
}

#[tokio::test]
async fn test_persist_set_stamps_timestamp() {
    let storage = Storage::in_memory();
    let stamp = storage
        .local_persist_set(PersistPatch {
            workspaces: Some(vec![workspace("a")]),
            settings: None,
        })
        .await
        .unwrap();

    let data = storage.local_get(&[StorageKey::Workspaces]).await.unwrap();
    assert_eq!(data.timestamp, Some(stamp));
    assert_eq!(data.workspaces.unwrap()[0].id, "a");
    // Not requested, not returned.
    assert!(data.settings.is_none());
}

#[tokio::test]
async fn test_state_set_does_not_stamp() {
    let storage = Storage::in_memory();
    let mut state = State::default();
    state.workspace_windows.insert("a".to_string(), 12);
    state.window_tabs.insert(12, Vec::new());
    storage.local_state_set(StatePatch::from(state)).await.unwrap();

    let data = storage
        .local_get(&[StorageKey::WorkspaceWindows, StorageKey::WindowTabs])
        .await
        .unwrap();
    assert!(data.timestamp.is_none());
    assert_eq!(data.workspace_windows.unwrap().get("a"), Some(&12));
    assert!(data.window_tabs.unwrap().contains_key(&12));
}

#[tokio::test]
async fn test_sync_round_trip_uses_plain_timestamp() {
    let local = MemoryStore::shared();
    let sync = MemoryStore::shared();
    let storage = Storage::new(local, sync.clone());

    let stamp = storage
        .sync_set(Persist {
            timestamp: 0,
            workspaces: vec![workspace("a")],
            settings: Settings {
                theme: ThemeMode::Dark,
                sync: SyncMode::On,
            },
        })
        .await
        .unwrap();

    let raw = sync.get(&["timestamp", "persist"]).await.unwrap();
    assert_eq!(raw["timestamp"], json!(stamp));
    assert!(raw["persist"].is_string());

    let read = storage.sync_get().await.unwrap().unwrap();
    assert_eq!(read.timestamp, stamp);
    assert_eq!(read.workspaces[0].id, "a");
    assert_eq!(read.settings.theme, ThemeMode::Dark);
}

#[tokio::test]
async fn test_undecodable_sync_payload_is_none() {
    let sync = MemoryStore::shared();
    sync.set(items(&[("timestamp", json!(5)), ("persist", json!("garbage"))]))
        .await
        .unwrap();
    let storage = Storage::new(MemoryStore::shared(), sync);
    assert!(storage.sync_get().await.unwrap().is_none());
}

#[tokio::test]
async fn test_structurally_invalid_sync_payload_is_none() {
    let mut bad = workspace("a");
    bad.color = "not a color".to_string();
    let payload = codec::compress(&Persist {
        timestamp: 5,
        workspaces: vec![bad],
        settings: Settings::default(),
    })
    .unwrap();

    let sync = MemoryStore::shared();
    sync.set(items(&[("timestamp", json!(5)), ("persist", json!(payload))]))
        .await
        .unwrap();
    let storage = Storage::new(MemoryStore::shared(), sync);
    assert!(storage.sync_get().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sqlite_store_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tabspace.db");

    let stamp = {
        let db = Arc::new(Database::open(&path).unwrap());
        let storage = Storage::new(
            Arc::new(SqliteStore::new(db.clone(), StoreArea::Local)),
            Arc::new(SqliteStore::new(db, StoreArea::Sync)),
        );
        storage
            .local_persist_set(PersistPatch {
                workspaces: Some(vec![workspace("kept")]),
                settings: Some(Settings::default()),
            })
            .await
            .unwrap()
    };

    let db = Arc::new(Database::open(&path).unwrap());
    let storage = Storage::new(
        Arc::new(SqliteStore::new(db.clone(), StoreArea::Local)),
        Arc::new(SqliteStore::new(db, StoreArea::Sync)),
    );
    let persist = storage.local_persist().await.unwrap();
    assert_eq!(persist.timestamp, stamp);
    assert_eq!(persist.workspaces[0].id, "kept");
    // The sync area is a separate partition.
    assert!(storage.sync_get().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sqlite_store_overwrites_and_clears() {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let store = SqliteStore::new(db, StoreArea::Local);

    store.set(items(&[("k", json!(1))])).await.unwrap();
    store.set(items(&[("k", json!({"v": 2}))])).await.unwrap();
    assert_eq!(store.get(&["k", "missing"]).await.unwrap(), items(&[("k", json!({"v": 2}))]));

    store.clear().await.unwrap();
    assert!(store.get(&["k"]).await.unwrap().is_empty());
}
