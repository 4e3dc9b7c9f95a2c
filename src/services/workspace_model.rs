//! Construction and structural validation of workspace entities.
//!
//! The `is_valid_*` predicates work on raw JSON because they guard data that
//! came from outside the process (import files, the sync store). A payload is
//! either accepted whole or rejected.

use chrono::Utc;
use serde_json::{Map, Value};

use crate::services::badge::is_valid_hex_color;
use crate::services::crypto_service::{CryptoService, CryptoServiceTrait};
use crate::types::browser::{BrowserTab, TAB_ID_NONE};
use crate::types::errors::WorkspaceError;
use crate::types::workspace::{Workspace, WorkspaceForm, WorkspaceTab};

pub const WORKSPACE_ID_PREFIX: &str = "wid-";
const ID_RANDOM_DIGITS: usize = 16;
/// Largest integer a JSON number carries exactly in the extension's runtime (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// `wid-<ms timestamp>-<16 base-36 digits>`.
pub fn generate_workspace_id() -> String {
    let crypto = CryptoService::new();
    format!(
        "{}{}-{}",
        WORKSPACE_ID_PREFIX,
        now_ms(),
        crypto.random_base36(ID_RANDOM_DIGITS)
    )
}

/// Builds a fresh, closed workspace from form input.
pub fn create_workspace(form: WorkspaceForm) -> Result<Workspace, WorkspaceError> {
    let WorkspaceForm {
        name,
        color,
        password,
        passpeek,
    } = form;

    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(WorkspaceError::InvalidField("name must not be empty".to_string()));
    }
    validate_color(&color)?;

    let mut workspace = Workspace {
        id: generate_workspace_id(),
        name,
        color,
        tabs: Vec::new(),
        created_at: now_ms(),
        last_opened: 0,
        window_id: None,
        password: String::new(),
        passpeek: String::new(),
        failed_attempts: None,
        lock_until: None,
    };
    if let Some(plain) = password.filter(|p| !p.is_empty()) {
        set_password(&mut workspace, plain, passpeek.unwrap_or_default());
    }
    Ok(workspace)
}

pub fn validate_color(color: &str) -> Result<(), WorkspaceError> {
    if is_valid_hex_color(color) {
        Ok(())
    } else {
        Err(WorkspaceError::InvalidField(format!("bad color: {}", color)))
    }
}

/// Rejects a workspace that would not survive the sync store or a re-import.
pub fn validate_workspace(workspace: &Workspace) -> Result<(), WorkspaceError> {
    let raw = serde_json::to_value(workspace)
        .map_err(|e| WorkspaceError::InvalidField(e.to_string()))?;
    if is_valid_workspace(&raw) {
        Ok(())
    } else {
        Err(WorkspaceError::InvalidField(format!(
            "workspace {} is malformed",
            workspace.id
        )))
    }
}

/// Stores the digest of `plain` and the caller's hint; resets the lockout.
pub fn set_password(workspace: &mut Workspace, mut plain: String, passpeek: String) {
    workspace.password = CryptoService::new().hash_password(&mut plain);
    workspace.passpeek = passpeek;
    workspace.failed_attempts = None;
    workspace.lock_until = None;
}

pub fn clear_password(workspace: &mut Workspace) {
    workspace.password.clear();
    workspace.passpeek.clear();
    workspace.failed_attempts = None;
    workspace.lock_until = None;
}

/// Converts a live tab into a workspace tab. A tab without identity cannot be tracked.
pub fn create_workspace_tab(tab: &BrowserTab) -> Result<WorkspaceTab, WorkspaceError> {
    let id = match tab.id {
        Some(id) if id != TAB_ID_NONE => id,
        _ => return Err(WorkspaceError::MissingTabId),
    };
    Ok(WorkspaceTab {
        id,
        index: tab.index,
        title: tab.title.clone().unwrap_or_default(),
        url: tab.url.clone().unwrap_or_default(),
        pinned: tab.pinned,
    })
}

fn is_safe_integer(v: &Value) -> bool {
    v.as_i64().map_or(false, |n| (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&n))
}

fn is_optional_safe_integer(obj: &Map<String, Value>, key: &str) -> bool {
    match obj.get(key) {
        None | Some(Value::Null) => true,
        Some(v) => is_safe_integer(v),
    }
}

fn is_optional_string(obj: &Map<String, Value>, key: &str) -> bool {
    matches!(obj.get(key), None | Some(Value::String(_)))
}

fn is_password_digest(obj: &Map<String, Value>) -> bool {
    match obj.get("password") {
        None => true,
        Some(Value::String(s)) => {
            s.is_empty() || (s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit()))
        }
        Some(_) => false,
    }
}

pub fn is_valid_workspace_tab(v: &Value) -> bool {
    let Some(obj) = v.as_object() else {
        return false;
    };
    is_optional_safe_integer(obj, "id")
        && obj.get("index").map_or(false, is_safe_integer)
        && obj.get("title").map_or(false, Value::is_string)
        && obj.get("url").map_or(false, Value::is_string)
        && obj.get("pinned").map_or(false, Value::is_boolean)
}

pub fn is_valid_workspace(v: &Value) -> bool {
    let Some(obj) = v.as_object() else {
        return false;
    };
    let id_ok = obj
        .get("id")
        .and_then(Value::as_str)
        .map_or(false, |id| !id.is_empty());
    let color_ok = obj
        .get("color")
        .and_then(Value::as_str)
        .map_or(false, is_valid_hex_color);
    let tabs_ok = obj
        .get("tabs")
        .and_then(Value::as_array)
        .map_or(false, |tabs| tabs.iter().all(is_valid_workspace_tab));
    let attempts_ok = match obj.get("failedAttempts") {
        None | Some(Value::Null) => true,
        Some(v) => v.as_u64().map_or(false, |n| n <= u32::MAX as u64),
    };

    id_ok
        && obj.get("name").map_or(false, Value::is_string)
        && color_ok
        && tabs_ok
        && obj.get("createdAt").map_or(false, is_safe_integer)
        && obj.get("lastOpened").map_or(false, is_safe_integer)
        && is_optional_safe_integer(obj, "windowId")
        && is_password_digest(obj)
        && is_optional_string(obj, "passpeek")
        && attempts_ok
        && is_optional_safe_integer(obj, "lockUntil")
}

pub fn is_valid_settings(v: &Value) -> bool {
    let Some(obj) = v.as_object() else {
        return false;
    };
    let theme_ok = matches!(
        obj.get("theme").and_then(Value::as_str),
        Some("auto" | "light" | "dark")
    );
    let sync_ok = matches!(obj.get("sync").and_then(Value::as_str), Some("on" | "off"));
    theme_ok && sync_ok
}
