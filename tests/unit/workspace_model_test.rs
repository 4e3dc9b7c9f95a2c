//! Unit tests for workspace construction and structural validation.

use rstest::rstest;
use serde_json::json;

use tabspace::services::crypto_service::{CryptoService, CryptoServiceTrait};
use tabspace::services::workspace_model::*;
use tabspace::types::browser::{BrowserTab, TAB_ID_NONE};
use tabspace::types::errors::WorkspaceError;
use tabspace::types::workspace::{WorkspaceForm, WorkspaceTab};

fn live_tab(id: Option<i64>) -> BrowserTab {
    BrowserTab {
        id,
        window_id: 4,
        index: 2,
        title: Some("Docs".to_string()),
        url: Some("https://docs.rs".to_string()),
        pinned: true,
        active: false,
    }
}

fn form(name: &str, color: &str) -> WorkspaceForm {
    WorkspaceForm {
        name: name.to_string(),
        color: color.to_string(),
        password: None,
        passpeek: None,
    }
}

// === create_workspace_tab ===

#[test]
fn workspace_tab_copies_live_fields() {
    let tab = create_workspace_tab(&live_tab(Some(17))).unwrap();
    assert_eq!(
        tab,
        WorkspaceTab {
            id: 17,
            index: 2,
            title: "Docs".to_string(),
            url: "https://docs.rs".to_string(),
            pinned: true,
        }
    );
}

#[rstest]
#[case(None)]
#[case(Some(TAB_ID_NONE))]
fn workspace_tab_without_id_is_rejected(#[case] id: Option<i64>) {
    let err = create_workspace_tab(&live_tab(id)).unwrap_err();
    assert!(matches!(err, WorkspaceError::MissingTabId));
}

#[test]
fn workspace_tab_defaults_missing_title_and_url() {
    let mut tab = live_tab(Some(3));
    tab.title = None;
    tab.url = None;
    let converted = create_workspace_tab(&tab).unwrap();
    assert_eq!(converted.title, "");
    assert_eq!(converted.url, "");
}

// === create_workspace ===

#[test]
fn create_trims_name() {
    let ws = create_workspace(form("  Work  ", "#1f6feb")).unwrap();
    assert_eq!(ws.name, "Work");
    assert!(ws.created_at > 0);
}

#[rstest]
#[case("blue")]
#[case("#12")]
#[case("#gggggg")]
#[case("")]
fn create_rejects_bad_color(#[case] color: &str) {
    let err = create_workspace(form("Work", color)).unwrap_err();
    assert!(matches!(err, WorkspaceError::InvalidField(_)));
}

#[test]
fn create_with_password_stores_digest() {
    let mut f = form("Private", "#000000");
    f.password = Some("hunter2".to_string());
    f.passpeek = Some("classic".to_string());

    let ws = create_workspace(f).unwrap();
    assert!(ws.has_password());
    assert_ne!(ws.password, "hunter2");
    assert_eq!(ws.password, CryptoService::new().sha256_hex("hunter2"));
    assert_eq!(ws.passpeek, "classic");
}

#[test]
fn empty_password_means_unprotected() {
    let mut f = form("Open", "#ffffff");
    f.password = Some(String::new());
    assert!(!create_workspace(f).unwrap().has_password());
}

#[test]
fn clear_password_resets_lock_state() {
    let mut ws = create_workspace(form("Private", "#000000")).unwrap();
    set_password(&mut ws, "pw".to_string(), "hint".to_string());
    ws.failed_attempts = Some(3);
    ws.lock_until = Some(i64::MAX);

    clear_password(&mut ws);
    assert!(!ws.has_password());
    assert_eq!(ws.passpeek, "");
    assert!(ws.failed_attempts.is_none());
    assert!(!ws.is_locked(now_ms()));
}

// === predicates ===

fn valid_workspace_json() -> serde_json::Value {
    json!({
        "id": "wid-1-abc",
        "name": "Work",
        "color": "#1f6feb",
        "tabs": [{"id": null, "index": 0, "title": "a", "url": "https://a", "pinned": false}],
        "createdAt": 1,
        "lastOpened": 2
    })
}

#[test]
fn valid_workspace_passes() {
    assert!(is_valid_workspace(&valid_workspace_json()));
}

#[rstest]
#[case("id", json!(""))]
#[case("name", json!(5))]
#[case("color", json!("red"))]
#[case("tabs", json!({}))]
#[case("createdAt", json!("yesterday"))]
#[case("lastOpened", json!(1.5))]
#[case("windowId", json!("7"))]
#[case("password", json!("plaintext"))]
#[case("failedAttempts", json!(-1))]
fn invalid_workspace_field_fails(#[case] key: &str, #[case] value: serde_json::Value) {
    let mut ws = valid_workspace_json();
    ws[key] = value;
    assert!(!is_valid_workspace(&ws));
}

#[test]
fn workspace_with_bad_tab_fails() {
    let mut ws = valid_workspace_json();
    ws["tabs"][0]["pinned"] = json!("yes");
    assert!(!is_valid_workspace(&ws));
}

#[test]
fn workspace_tab_predicate() {
    assert!(is_valid_workspace_tab(
        &json!({"id": 3, "index": 0, "title": "", "url": "", "pinned": true})
    ));
    assert!(!is_valid_workspace_tab(&json!({"index": 0, "title": "", "url": ""})));
    assert!(!is_valid_workspace_tab(&json!([1, 0, "", "", true])));
}

#[rstest]
#[case(json!({"theme": "auto", "sync": "off"}), true)]
#[case(json!({"theme": "dark", "sync": "on"}), true)]
#[case(json!({"theme": "blue", "sync": "on"}), false)]
#[case(json!({"theme": "light"}), false)]
#[case(json!(null), false)]
fn settings_predicate(#[case] settings: serde_json::Value, #[case] expected: bool) {
    assert_eq!(is_valid_settings(&settings), expected);
}

#[test]
fn null_tab_id_deserializes_as_none() {
    let tab: WorkspaceTab =
        serde_json::from_value(json!({"id": null, "index": 0, "title": "", "url": "", "pinned": false}))
            .unwrap();
    assert_eq!(tab.id, TAB_ID_NONE);
}

#[test]
fn pinned_tabs_keeps_stored_order() {
    let mut ws = create_workspace(form("Pins", "#ffffff")).unwrap();
    ws.tabs = vec![
        WorkspaceTab { id: 1, index: 0, title: "a".into(), url: "a".into(), pinned: true },
        WorkspaceTab { id: 2, index: 1, title: "b".into(), url: "b".into(), pinned: false },
        WorkspaceTab { id: 3, index: 2, title: "c".into(), url: "c".into(), pinned: true },
    ];
    let ids: Vec<i64> = ws.pinned_tabs().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3]);
}
