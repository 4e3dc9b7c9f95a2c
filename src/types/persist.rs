use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::browser::BrowserTab;
use super::settings::Settings;
use super::workspace::Workspace;

/// Storage keys shared by the local and sync stores.
pub const KEY_WORKSPACES: &str = "workspaces";
pub const KEY_SETTINGS: &str = "settings";
pub const KEY_TIMESTAMP: &str = "timestamp";
/// Local-only bookkeeping keys.
pub const KEY_WORKSPACE_WINDOWS: &str = "_workspaceWindows";
pub const KEY_WINDOW_TABS: &str = "_windowTabs";
/// Sync-only key holding the compact codec payload.
pub const KEY_SYNC_PAYLOAD: &str = "persist";

/// The durable, synced bundle. This is also the export file format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Persist {
    pub timestamp: i64,
    pub workspaces: Vec<Workspace>,
    pub settings: Settings,
}

/// Local-only window bookkeeping. Window ids are JSON object keys, hence strings on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct State {
    #[serde(rename = "_workspaceWindows", default)]
    pub workspace_windows: HashMap<String, i64>,
    #[serde(rename = "_windowTabs", default)]
    pub window_tabs: HashMap<i64, Vec<BrowserTab>>,
}

/// Keys accepted by `Storage::local_get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    Workspaces,
    Settings,
    WorkspaceWindows,
    WindowTabs,
}

impl StorageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Workspaces => KEY_WORKSPACES,
            StorageKey::Settings => KEY_SETTINGS,
            StorageKey::WorkspaceWindows => KEY_WORKSPACE_WINDOWS,
            StorageKey::WindowTabs => KEY_WINDOW_TABS,
        }
    }
}

/// Partial read of the local store. `timestamp` is always fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredData {
    pub timestamp: Option<i64>,
    pub workspaces: Option<Vec<Workspace>>,
    pub settings: Option<Settings>,
    pub workspace_windows: Option<HashMap<String, i64>>,
    pub window_tabs: Option<HashMap<i64, Vec<BrowserTab>>>,
}

/// Persist fields to write; `None` leaves the key untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistPatch {
    pub workspaces: Option<Vec<Workspace>>,
    pub settings: Option<Settings>,
}

/// State fields to write; `None` leaves the key untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub workspace_windows: Option<HashMap<String, i64>>,
    pub window_tabs: Option<HashMap<i64, Vec<BrowserTab>>>,
}

impl From<State> for StatePatch {
    fn from(state: State) -> Self {
        Self {
            workspace_windows: Some(state.workspace_windows),
            window_tabs: Some(state.window_tabs),
        }
    }
}
