use std::collections::HashMap;

use crate::types::browser::BrowserTab;
use crate::types::persist::State;

/// Which workspace owns which open window, and the last known tabs of each.
///
/// Every operation on a window that is not a tracked workspace window is a
/// no-op: most browser events concern windows we do not manage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingTable {
    workspace_windows: HashMap<String, i64>,
    window_tabs: HashMap<i64, Vec<BrowserTab>>,
}

impl TrackingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: State) -> Self {
        Self {
            workspace_windows: state.workspace_windows,
            window_tabs: state.window_tabs,
        }
    }

    pub fn to_state(&self) -> State {
        State {
            workspace_windows: self.workspace_windows.clone(),
            window_tabs: self.window_tabs.clone(),
        }
    }

    /// Reverse lookup. A scan is fine: one entry per open workspace window.
    pub fn workspace_for_window(&self, window_id: i64) -> Option<&str> {
        self.workspace_windows
            .iter()
            .find(|(_, w)| **w == window_id)
            .map(|(ws, _)| ws.as_str())
    }

    pub fn window_for_workspace(&self, workspace_id: &str) -> Option<i64> {
        self.workspace_windows.get(workspace_id).copied()
    }

    pub fn is_tracked_window(&self, window_id: i64) -> bool {
        self.workspace_for_window(window_id).is_some()
    }

    pub fn open_workspaces(&self) -> Vec<(String, i64)> {
        self.workspace_windows
            .iter()
            .map(|(ws, w)| (ws.clone(), *w))
            .collect()
    }

    pub fn window_tabs(&self, window_id: i64) -> Option<&[BrowserTab]> {
        self.window_tabs.get(&window_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.workspace_windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspace_windows.is_empty()
    }

    /// Records that `workspace_id` is now shown in `window_id`.
    pub fn activate(&mut self, workspace_id: &str, window_id: i64, tabs: Vec<BrowserTab>) {
        if let Some(previous) = self.workspace_windows.insert(workspace_id.to_string(), window_id) {
            if previous != window_id {
                self.window_tabs.remove(&previous);
            }
        }
        self.window_tabs.insert(window_id, tabs);
    }

    /// Appends a new tab to its window's cached list. Returns false if untracked.
    pub fn add_tab_to_window(&mut self, tab: BrowserTab) -> bool {
        if !self.is_tracked_window(tab.window_id) {
            return false;
        }
        self.window_tabs.entry(tab.window_id).or_default().push(tab);
        true
    }

    /// Overwrites a tracked window's cached list. Returns false if untracked.
    pub fn replace_window_tabs(&mut self, window_id: i64, tabs: Vec<BrowserTab>) -> bool {
        if !self.is_tracked_window(window_id) {
            return false;
        }
        self.window_tabs.insert(window_id, tabs);
        true
    }

    /// Sets the pinned flag of one cached tab. Returns false if nothing matched.
    pub fn set_tab_pinned(&mut self, window_id: i64, tab_id: i64, pinned: bool) -> bool {
        if !self.is_tracked_window(window_id) {
            return false;
        }
        match self
            .window_tabs
            .get_mut(&window_id)
            .and_then(|tabs| tabs.iter_mut().find(|t| t.id == Some(tab_id)))
        {
            Some(tab) => {
                tab.pinned = pinned;
                true
            }
            None => false,
        }
    }

    /// Marks a workspace closed, returning its window and last known tabs.
    pub fn deactivate(&mut self, workspace_id: &str) -> Option<(i64, Vec<BrowserTab>)> {
        let window_id = self.workspace_windows.remove(workspace_id)?;
        let tabs = self.window_tabs.remove(&window_id).unwrap_or_default();
        Some((window_id, tabs))
    }

    pub fn clear(&mut self) {
        self.workspace_windows.clear();
        self.window_tabs.clear();
    }
}
