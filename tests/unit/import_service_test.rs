//! Unit tests for import validation and merge.

use serde_json::json;

use tabspace::services::import_service::{
    import_data, import_file_text, merge_workspaces, validate_import,
};
use tabspace::services::storage::Storage;
use tabspace::types::errors::ImportError;
use tabspace::types::persist::PersistPatch;
use tabspace::types::settings::{Settings, ThemeMode};
use tabspace::types::workspace::Workspace;

fn workspace(id: &str, name: &str) -> Workspace {
    Workspace {
        id: id.to_string(),
        name: name.to_string(),
        color: "#1f6feb".to_string(),
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

fn payload(workspaces: &[Workspace]) -> serde_json::Value {
    json!({
        "timestamp": 1,
        "workspaces": workspaces,
        "settings": {"theme": "light", "sync": "off"}
    })
}

#[test]
fn test_merge_adds_only_new_ids() {
    let mut local = vec![workspace("a", "Local A")];
    let incoming = vec![workspace("a", "Incoming A"), workspace("b", "Incoming B")];

    let (added, skipped) = merge_workspaces(&mut local, incoming);
    assert_eq!((added, skipped), (1, 1));
    assert_eq!(local.len(), 2);
    assert_eq!(local[0].name, "Local A");
    assert_eq!(local[1].id, "b");
}

#[test]
fn test_merge_dedupes_within_incoming_and_clears_window() {
    let mut local = Vec::new();
    let mut b = workspace("b", "B");
    b.window_id = Some(44);
    let (added, skipped) = merge_workspaces(&mut local, vec![b.clone(), b]);
    assert_eq!((added, skipped), (1, 1));
    assert!(local[0].window_id.is_none());
}

#[test]
fn test_validate_rejects_wholesale() {
    let mut raw = payload(&[workspace("a", "A"), workspace("b", "B")]);
    raw["workspaces"][1]["color"] = json!("purple");
    let err = validate_import(&raw).unwrap_err();
    assert!(matches!(err, ImportError::InvalidPayload(_)));
    assert!(err.to_string().contains("#2"));
}

#[test]
fn test_validate_requires_workspace_array() {
    assert!(validate_import(&json!({"settings": {"theme": "auto", "sync": "off"}})).is_err());
    assert!(validate_import(&json!([])).is_err());
    assert!(validate_import(&json!({"workspaces": [], "settings": {"theme": 1}})).is_err());
}

#[test]
fn test_validate_requires_settings() {
    let mut raw = payload(&[workspace("a", "A")]);
    raw.as_object_mut().unwrap().remove("settings");
    let err = validate_import(&raw).unwrap_err();
    assert!(err.to_string().contains("\"settings\" is missing"));

    raw["settings"] = json!(null);
    assert!(validate_import(&raw).is_err());
}

#[tokio::test]
async fn test_import_merges_and_keeps_local_settings() {
    let storage = Storage::in_memory();
    let local_settings = Settings {
        theme: ThemeMode::Dark,
        ..Settings::default()
    };
    storage
        .local_persist_set(PersistPatch {
            workspaces: Some(vec![workspace("a", "Local A")]),
            settings: Some(local_settings.clone()),
        })
        .await
        .unwrap();

    let result = import_data(
        &storage,
        &payload(&[workspace("a", "Incoming A"), workspace("b", "Incoming B")]),
    )
    .await
    .unwrap();

    assert!(result.succ);
    assert_eq!(result.added_count, 1);
    assert_eq!(result.skipped_count, 1);

    let persist = storage.local_persist().await.unwrap();
    let names: Vec<&str> = persist.workspaces.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Local A", "Incoming B"]);
    assert_eq!(persist.settings, local_settings);
}

#[tokio::test]
async fn test_invalid_import_writes_nothing() {
    let storage = Storage::in_memory();
    let mut raw = payload(&[workspace("b", "B")]);
    raw["workspaces"][0]["tabs"] = json!([{"index": "zero"}]);

    let result = import_data(&storage, &raw).await.unwrap();
    assert!(!result.succ);
    assert_eq!(result.added_count, 0);
    assert!(storage.local_persist().await.unwrap().workspaces.is_empty());
}

#[tokio::test]
async fn test_import_file_text_reports_bad_json() {
    let storage = Storage::in_memory();
    let result = import_file_text(&storage, "{ nope").await.unwrap();
    assert!(!result.succ);
    assert!(result.message.contains("not valid JSON"));
}

#[tokio::test]
async fn test_result_serializes_camel_case() {
    let storage = Storage::in_memory();
    let text = payload(&[workspace("z", "Z")]).to_string();
    let result = import_file_text(&storage, &text).await.unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["addedCount"], json!(1));
    assert_eq!(value["skippedCount"], json!(0));
}
