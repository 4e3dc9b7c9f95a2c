//! Command handler for the Tabspace message protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_message` dispatches an action name plus JSON payload to the
//! managers and services on `App` and always answers with a JSON object.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::{App, Page};
use crate::managers::workspace_manager::WorkspaceManagerTrait;
use crate::services::import_service::{import_data, import_file_text};
use crate::services::sync_scheduler::SyncStatus;
use crate::services::workspace_model::is_valid_workspace;
use crate::types::browser::BrowserEvent;
use crate::types::settings::Settings;
use crate::types::workspace::{Workspace, WorkspaceForm};

fn str_param<'a>(payload: &'a Value, key: &str) -> Result<&'a str, String> {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn form_param(payload: &Value) -> Result<WorkspaceForm, String> {
    serde_json::from_value(payload.clone()).map_err(|e| format!("invalid workspace form: {}", e))
}

/// Handles one message and converts any failure into `{"succ": false, "error": ...}`.
pub async fn handle_message(app: &App, action: &str, payload: &Value) -> Value {
    match dispatch(app, action, payload).await {
        Ok(value) => value,
        Err(err) => {
            warn!(action, error = %err, "Message failed");
            json!({"succ": false, "error": err})
        }
    }
}

/// Dispatch an action to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn dispatch(app: &App, action: &str, payload: &Value) -> Result<Value, String> {
    debug!(action, "Handling message");
    match action {
        // ─── Workspace windows ───
        "open" => {
            let outcome = match payload.get("workspace") {
                Some(raw) => {
                    if !is_valid_workspace(raw) {
                        return Err("invalid workspace".to_string());
                    }
                    let workspace: Workspace = serde_json::from_value(raw.clone())
                        .map_err(|e| format!("invalid workspace: {}", e))?;
                    app.workspace_manager.open(&workspace).await
                }
                None => {
                    let id = str_param(payload, "workspaceId")?;
                    app.workspace_manager.open_by_id(id).await
                }
            }
            .map_err(|e| e.to_string())?;
            Ok(json!({"succ": true, "windowId": outcome.window_id, "reused": outcome.reused}))
        }

        // ─── Sync ───
        "toggle-sync" => {
            let on = payload
                .get("on")
                .and_then(|v| v.as_bool())
                .ok_or("missing on")?;
            app.toggle_sync(on).await.map_err(|e| e.to_string())?;
            Ok(json!({"succ": true}))
        }

        // ─── Import / export ───
        "export" => {
            let file = app.export().await.map_err(|e| e.to_string())?;
            Ok(json!({"succ": true, "fileName": file.file_name, "data": file.data}))
        }
        "return-file-data" => {
            let data = payload.get("data").ok_or("missing data")?;
            let result = match data {
                Value::String(text) => import_file_text(&app.storage, text).await,
                other => import_data(&app.storage, other).await,
            }
            .map_err(|e| e.to_string())?;
            serde_json::to_value(result).map_err(|e| e.to_string())
        }
        "open-page" => {
            let name = str_param(payload, "page")?;
            let page = Page::parse(name).ok_or_else(|| format!("unknown page: {}", name))?;
            let window_id = app.open_page(page).await.map_err(|e| e.to_string())?;
            Ok(json!({"succ": true, "windowId": window_id}))
        }

        // ─── Workspace CRUD ───
        "list-workspaces" => {
            let workspaces = app
                .workspace_manager
                .list_workspaces()
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"succ": true, "workspaces": workspaces}))
        }
        "create-workspace" => {
            let form = form_param(payload)?;
            let workspace = app
                .workspace_manager
                .create_workspace(form)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"succ": true, "workspace": workspace}))
        }
        "edit-workspace" => {
            let id = str_param(payload, "id")?;
            let form = form_param(payload)?;
            let workspace = app
                .workspace_manager
                .edit_workspace(id, form)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"succ": true, "workspace": workspace}))
        }
        "delete-workspace" => {
            let id = str_param(payload, "id")?;
            app.workspace_manager
                .delete_workspace(id)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"succ": true}))
        }
        "verify-password" => {
            let id = str_param(payload, "id")?;
            let attempt = str_param(payload, "password")?;
            let valid = app
                .workspace_manager
                .verify_password(id, attempt)
                .await
                .map_err(|e| e.to_string())?;
            Ok(json!({"succ": true, "valid": valid}))
        }

        // ─── Settings ───
        "get-settings" => {
            let settings = app.settings().await.map_err(|e| e.to_string())?;
            Ok(json!({"succ": true, "settings": settings}))
        }
        "set-settings" => {
            let raw = payload.get("settings").ok_or("missing settings")?;
            let settings: Settings = serde_json::from_value(raw.clone())
                .map_err(|e| format!("invalid settings: {}", e))?;
            app.save_settings(settings).await.map_err(|e| e.to_string())?;
            Ok(json!({"succ": true}))
        }

        _ => Err(format!("Unknown message: {}", action)),
    }
}

// ─── Host bridge ───

/// Routes one protocol line from the host.
///
/// `{"event": ...}` lines go straight to `events`. Commands run on their own
/// task and answer through `out`, so an `open` waiting for its window never
/// holds up the events that window produces. Returns the command task, if any.
pub fn route_line(
    app: &Arc<App>,
    line: &str,
    events: &UnboundedSender<BrowserEvent>,
    out: &UnboundedSender<Value>,
) -> Option<JoinHandle<()>> {
    let msg: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            if out
                .send(json!({"id": null, "error": format!("parse error: {}", e)}))
                .is_err()
            {
                warn!("Output closed, dropping parse error");
            }
            return None;
        }
    };

    if let Some(raw) = msg.get("event") {
        match serde_json::from_value::<BrowserEvent>(raw.clone()) {
            Ok(event) => {
                if events.send(event).is_err() {
                    warn!("Event pump is gone, dropping browser event");
                }
            }
            Err(e) => warn!(error = %e, "Ignoring malformed browser event"),
        }
        return None;
    }

    let id = msg.get("id").cloned().unwrap_or(Value::Null);
    let action = msg
        .get("action")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let payload = msg.get("payload").cloned().unwrap_or_else(|| json!({}));
    let app = Arc::clone(app);
    let out = out.clone();
    Some(tokio::spawn(async move {
        let response = handle_message(&app, &action, &payload).await;
        if out.send(json!({"id": id, "response": response})).is_err() {
            warn!(action = %action, "Output closed, dropping response");
        }
    }))
}

/// `{"event": "syncStatus", "data": {"status": ..., "message": ...}}`.
pub fn sync_status_event(status: &SyncStatus) -> Value {
    json!({"event": "syncStatus", "data": status})
}

/// Pushes every sync status change to `out` until either side goes away.
pub fn spawn_sync_status_forwarder(app: &App, out: UnboundedSender<Value>) -> JoinHandle<()> {
    let mut statuses = app.sync_scheduler.subscribe();
    tokio::spawn(async move {
        loop {
            match statuses.recv().await {
                Ok(status) => {
                    if out.send(sync_status_event(&status)).is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Sync status forwarder fell behind")
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
