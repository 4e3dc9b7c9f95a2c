//! Import of exported workspace files.
//!
//! The payload is validated as a whole before anything is written. Merging
//! only ever adds: a workspace whose id already exists locally is skipped,
//! never overwritten. Local settings are kept as they are.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::services::storage::Storage;
use crate::services::workspace_model::{is_valid_settings, is_valid_workspace};
use crate::types::errors::ImportError;
use crate::types::persist::{PersistPatch, StorageKey, KEY_SETTINGS, KEY_WORKSPACES};
use crate::types::workspace::Workspace;

/// What the caller shows the user after an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub succ: bool,
    pub message: String,
    pub added_count: usize,
    pub skipped_count: usize,
}

impl ImportResult {
    fn rejected(message: String) -> Self {
        Self {
            succ: false,
            message,
            added_count: 0,
            skipped_count: 0,
        }
    }
}

/// Checks the shape of an import payload and returns its workspaces.
pub fn validate_import(payload: &Value) -> Result<Vec<Workspace>, ImportError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ImportError::InvalidPayload("expected a JSON object".to_string()))?;

    let list = obj
        .get(KEY_WORKSPACES)
        .and_then(Value::as_array)
        .ok_or_else(|| ImportError::InvalidPayload("\"workspaces\" must be an array".to_string()))?;

    if let Some(pos) = list.iter().position(|w| !is_valid_workspace(w)) {
        let name = list[pos].get("name").and_then(Value::as_str).unwrap_or("?");
        return Err(ImportError::InvalidPayload(format!(
            "workspace #{} ({}) is malformed",
            pos + 1,
            name
        )));
    }

    match obj.get(KEY_SETTINGS) {
        Some(settings) if is_valid_settings(settings) => {}
        Some(_) => {
            return Err(ImportError::InvalidPayload("\"settings\" is malformed".to_string()))
        }
        None => return Err(ImportError::InvalidPayload("\"settings\" is missing".to_string())),
    }

    list.iter()
        .map(|w| {
            serde_json::from_value(w.clone())
                .map_err(|e| ImportError::InvalidPayload(e.to_string()))
        })
        .collect()
}

/// Appends to `local` every incoming workspace whose id is new. Returns (added, skipped).
pub fn merge_workspaces(local: &mut Vec<Workspace>, incoming: Vec<Workspace>) -> (usize, usize) {
    let mut known: HashSet<String> = local.iter().map(|w| w.id.clone()).collect();
    let mut added = 0;
    let mut skipped = 0;
    for mut workspace in incoming {
        if known.insert(workspace.id.clone()) {
            // A window id from another session means nothing here.
            workspace.window_id = None;
            local.push(workspace);
            added += 1;
        } else {
            skipped += 1;
        }
    }
    (added, skipped)
}

/// Validates and merges an import payload into local storage.
pub async fn import_data(storage: &Storage, payload: &Value) -> Result<ImportResult, ImportError> {
    let incoming = match validate_import(payload) {
        Ok(list) => list,
        Err(e @ ImportError::InvalidPayload(_)) => return Ok(ImportResult::rejected(e.to_string())),
        Err(e) => return Err(e),
    };

    let data = storage.local_get(&[StorageKey::Workspaces]).await?;
    let mut workspaces = data.workspaces.unwrap_or_default();
    let (added, skipped) = merge_workspaces(&mut workspaces, incoming);

    if added > 0 {
        storage
            .local_persist_set(PersistPatch {
                workspaces: Some(workspaces),
                settings: None,
            })
            .await?;
    }

    info!(added, skipped, "Workspaces imported");
    Ok(ImportResult {
        succ: true,
        message: format!("Imported {} workspace(s), skipped {} duplicate(s)", added, skipped),
        added_count: added,
        skipped_count: skipped,
    })
}

/// Parses file text and imports it. Invalid JSON is reported, not raised.
pub async fn import_file_text(storage: &Storage, text: &str) -> Result<ImportResult, ImportError> {
    match serde_json::from_str::<Value>(text) {
        Ok(payload) => import_data(storage, &payload).await,
        Err(e) => Ok(ImportResult::rejected(ImportError::Parse(e.to_string()).to_string())),
    }
}
