//! Workspace Manager: opens workspaces as windows and keeps the persisted
//! workspaces in step with what the browser reports.
//!
//! A workspace is Closed (no tracking entry), Opening (for the duration of
//! `open`) or Open (tracking entry present). Browser events arrive in no
//! particular order, so tab-list changes are handled by re-querying the whole
//! window rather than patching deltas. The only targeted patch is a pin toggle.
//!
//! User commands go through `WorkspaceManagerTrait`; event reconciliation and
//! startup are inherent methods driven by the host.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser::BrowserApi;
use crate::managers::tracking_table::TrackingTable;
use crate::services::badge::badge_for;
use crate::services::crypto_service::{CryptoService, CryptoServiceTrait};
use crate::services::retry::retry_until;
use crate::services::storage::Storage;
use crate::services::workspace_model::{
    clear_password, create_workspace, create_workspace_tab, now_ms, set_password,
    validate_color, validate_workspace,
};
use crate::types::browser::{
    BrowserEvent, BrowserTab, BrowserWindow, CreateTabOptions, CreateWindowOptions, TAB_ID_NONE,
};
use crate::types::config::EngineConfig;
use crate::types::errors::{StorageError, WorkspaceError};
use crate::types::persist::{PersistPatch, State, StatePatch, StorageKey};
use crate::types::settings::Settings;
use crate::types::workspace::{Workspace, WorkspaceForm, WorkspaceTab};

/// Result of `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOutcome {
    pub window_id: i64,
    /// True when an already-open window was focused instead of creating one.
    pub reused: bool,
}

/// Which store won startup arbitration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StartupSource {
    Local,
    Sync,
    Fresh,
}

/// Workspace operations driven by user commands.
#[async_trait]
pub trait WorkspaceManagerTrait: Send + Sync {
    /// Opens `workspace` in a window, restoring its tabs in index order, or
    /// focuses the window it already has.
    ///
    /// Individual tabs that fail to open are skipped; pinning and the readiness
    /// wait are best-effort.
    ///
    /// # Errors
    ///
    /// `InvalidField` if the workspace would not pass structural validation,
    /// `Browser` if no window could be created at all, `Storage` if the
    /// updated workspace could not be saved.
    async fn open(&self, workspace: &Workspace) -> Result<OpenOutcome, WorkspaceError>;

    /// Opens (or focuses) the window for a stored workspace.
    ///
    /// # Errors
    ///
    /// `NotFound` if no stored workspace has this id; otherwise as `open`.
    async fn open_by_id(&self, workspace_id: &str) -> Result<OpenOutcome, WorkspaceError>;

    async fn list_workspaces(&self) -> Result<Vec<Workspace>, WorkspaceError>;

    /// # Errors
    ///
    /// `InvalidField` for an empty name or a color that is not `#rgb`/`#rrggbb`.
    async fn create_workspace(&self, form: WorkspaceForm) -> Result<Workspace, WorkspaceError>;

    /// Updates name, color and password. `password: Some("")` removes protection.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `InvalidField` as for `create_workspace`.
    async fn edit_workspace(
        &self,
        workspace_id: &str,
        form: WorkspaceForm,
    ) -> Result<Workspace, WorkspaceError>;

    /// Removes a workspace. An open window stays open but is no longer tracked.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    async fn delete_workspace(&self, workspace_id: &str) -> Result<(), WorkspaceError>;

    /// Checks a password attempt, counting failures and locking after too many.
    /// An unprotected workspace always verifies.
    ///
    /// # Errors
    ///
    /// `Locked { until }` while a lockout is active, `NotFound` for an unknown id.
    async fn verify_password(&self, workspace_id: &str, attempt: &str)
        -> Result<bool, WorkspaceError>;
}

pub struct WorkspaceManager {
    browser: Arc<dyn BrowserApi>,
    storage: Arc<Storage>,
    config: EngineConfig,
    table: Mutex<TrackingTable>,
    ready_windows: Mutex<HashSet<i64>>,
    ready_notify: Notify,
}

impl WorkspaceManager {
    pub fn new(browser: Arc<dyn BrowserApi>, storage: Arc<Storage>, config: EngineConfig) -> Self {
        Self {
            browser,
            storage,
            config,
            table: Mutex::new(TrackingTable::new()),
            ready_windows: Mutex::new(HashSet::new()),
            ready_notify: Notify::new(),
        }
    }

    fn table(&self) -> MutexGuard<'_, TrackingTable> {
        self.table.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn ready(&self) -> MutexGuard<'_, HashSet<i64>> {
        self.ready_windows.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn window_for_workspace(&self, workspace_id: &str) -> Option<i64> {
        self.table().window_for_workspace(workspace_id)
    }

    pub fn workspace_for_window(&self, window_id: i64) -> Option<String> {
        self.table().workspace_for_window(window_id).map(str::to_string)
    }

    pub fn tracking_state(&self) -> State {
        self.table().to_state()
    }

    async fn persist_table(&self) {
        let state = self.table().to_state();
        if let Err(e) = self.storage.local_state_set(StatePatch::from(state)).await {
            warn!(error = %e, "Failed to persist tracking table");
        }
    }

    async fn load_workspaces(&self) -> Result<Vec<Workspace>, StorageError> {
        let data = self.storage.local_get(&[StorageKey::Workspaces]).await?;
        Ok(data.workspaces.unwrap_or_default())
    }

    async fn save_workspaces(&self, workspaces: Vec<Workspace>) -> Result<(), StorageError> {
        self.storage
            .local_persist_set(PersistPatch {
                workspaces: Some(workspaces),
                settings: None,
            })
            .await?;
        Ok(())
    }

    // ─── Startup ───

    /// Picks the newer of the local and sync stores and starts with no open windows.
    ///
    /// Windows left over from a previous session are not re-discovered.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if either store cannot be read or the result
    /// cannot be written back.
    pub async fn initialize(&self) -> Result<(StartupSource, Settings), StorageError> {
        let local = self
            .storage
            .local_get(&[StorageKey::Workspaces, StorageKey::Settings])
            .await?;
        let synced = self.storage.sync_get().await?;

        let (source, mut workspaces, settings) = match (local.timestamp, synced) {
            (Some(local_ts), Some(remote)) if remote.timestamp > local_ts => {
                (StartupSource::Sync, remote.workspaces, remote.settings)
            }
            (Some(_), _) => (
                StartupSource::Local,
                local.workspaces.unwrap_or_default(),
                local.settings.unwrap_or_default(),
            ),
            (None, Some(remote)) => (StartupSource::Sync, remote.workspaces, remote.settings),
            (None, None) => (StartupSource::Fresh, Vec::new(), Settings::default()),
        };

        for workspace in &mut workspaces {
            workspace.window_id = None;
        }
        self.storage
            .local_persist_set(PersistPatch {
                workspaces: Some(workspaces),
                settings: Some(settings.clone()),
            })
            .await?;

        self.table().clear();
        self.ready().clear();
        self.storage
            .local_state_set(StatePatch::from(State::default()))
            .await?;

        info!(source = ?source, "Workspace data initialized");
        Ok((source, settings))
    }

    // ─── Opening helpers ───

    /// Creates the window from the first tab's URL, then the rest at their stored index.
    async fn create_window_with_tabs(
        &self,
        ordered: &[WorkspaceTab],
    ) -> Result<(BrowserWindow, Vec<(WorkspaceTab, BrowserTab)>), WorkspaceError> {
        let mut opened = Vec::with_capacity(ordered.len());

        let Some((first, rest)) = ordered.split_first() else {
            let window = self
                .browser
                .create_window(CreateWindowOptions {
                    focused: true,
                    ..CreateWindowOptions::default()
                })
                .await?;
            return Ok((window, opened));
        };

        let window = match self
            .browser
            .create_window(CreateWindowOptions {
                url: Some(first.url.clone()),
                focused: true,
                ..CreateWindowOptions::default()
            })
            .await
        {
            Ok(window) => {
                if let Some(live) = window.tabs.first() {
                    opened.push((first.clone(), live.clone()));
                }
                window
            }
            Err(e) => {
                warn!(url = %first.url, error = %e, "Failed to open first tab, starting blank");
                self.browser
                    .create_window(CreateWindowOptions {
                        focused: true,
                        ..CreateWindowOptions::default()
                    })
                    .await?
            }
        };

        for stored in rest {
            let result = self
                .browser
                .create_tab(CreateTabOptions {
                    window_id: window.id,
                    url: stored.url.clone(),
                    index: Some(stored.index),
                    active: false,
                })
                .await;
            match result {
                Ok(live) => opened.push((stored.clone(), live)),
                Err(e) => warn!(url = %stored.url, error = %e, "Failed to open tab, skipping"),
            }
        }

        Ok((window, opened))
    }

    fn mark_ready(&self, window_id: i64) {
        self.ready().insert(window_id);
        self.ready_notify.notify_waiters();
    }

    /// Waits for the first tab-updated event of `window_id`. False on timeout.
    async fn wait_window_ready(&self, window_id: i64) -> bool {
        let wait = async {
            loop {
                let notified = self.ready_notify.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if self.ready().remove(&window_id) {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(self.config.ready_timeout(), wait)
            .await
            .is_ok()
    }

    fn spawn_pin(&self, tab_id: i64) {
        let browser = Arc::clone(&self.browser);
        let attempts = self.config.pin_retry_attempts;
        let interval = self.config.pin_retry_interval();
        tokio::spawn(async move {
            let outcome = retry_until(attempts, interval, |_| {
                let browser = Arc::clone(&browser);
                async move {
                    match browser.get_tab(tab_id).await {
                        Ok(tab) if tab.pinned => true,
                        Ok(_) => {
                            if let Err(e) = browser.set_tab_pinned(tab_id, true).await {
                                debug!(tab_id, error = %e, "Pin request rejected, will retry");
                            }
                            false
                        }
                        Err(e) => {
                            debug!(tab_id, error = %e, "Tab not available yet, will retry");
                            false
                        }
                    }
                }
            })
            .await;
            if !outcome.is_success() {
                warn!(tab_id, attempts, "Gave up pinning tab");
            }
            outcome
        });
    }

    async fn apply_badge(&self, window_id: i64, workspace: &Workspace) {
        let badge = badge_for(&workspace.name, &workspace.color);
        if let Err(e) = self.browser.set_badge(window_id, &badge).await {
            warn!(window_id, error = %e, "Failed to set window badge");
        }
    }

    // ─── Event reconciliation ───

    /// Feeds browser events to `handle_event` until the sender goes away.
    pub fn spawn_event_pump(
        self: &Arc<Self>,
        mut events: UnboundedReceiver<BrowserEvent>,
    ) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                manager.handle_event(event).await;
            }
            debug!("Browser event stream closed");
        })
    }

    /// Applies one browser event. Errors are logged, never returned.
    pub async fn handle_event(&self, event: BrowserEvent) {
        match event {
            BrowserEvent::TabCreated { tab } => self.add_tab_to_window(tab).await,
            BrowserEvent::TabAttached { new_window_id, .. } => {
                self.refresh_window_tab(new_window_id).await
            }
            BrowserEvent::TabDetached { old_window_id, .. } => {
                self.refresh_window_tab(old_window_id).await
            }
            BrowserEvent::TabMoved { window_id, .. } => self.refresh_window_tab(window_id).await,
            BrowserEvent::TabRemoved {
                window_id,
                is_window_closing,
                ..
            } => {
                // Keep the last list intact so WindowRemoved can capture it.
                if !is_window_closing {
                    self.refresh_window_tab(window_id).await;
                }
            }
            BrowserEvent::TabUpdated { tab_id, change, tab } => {
                self.mark_ready(tab.window_id);
                match change.pinned {
                    Some(pinned) if change.is_pinned_only() => {
                        self.patch_pinned(tab.window_id, tab_id, pinned).await
                    }
                    _ => self.refresh_window_tab(tab.window_id).await,
                }
            }
            BrowserEvent::WindowRemoved { window_id } => {
                self.ready().remove(&window_id);
                self.close_window(window_id).await;
            }
        }
    }

    /// Appends a newly created tab if its window belongs to a workspace.
    pub async fn add_tab_to_window(&self, tab: BrowserTab) {
        let tracked = self.table().add_tab_to_window(tab);
        if tracked {
            self.persist_table().await;
        }
    }

    /// Re-reads a tracked window's tabs from the browser and replaces the cache.
    pub async fn refresh_window_tab(&self, window_id: i64) {
        if !self.table().is_tracked_window(window_id) {
            return;
        }
        match self.browser.query_tabs(window_id).await {
            Ok(tabs) => {
                let replaced = self.table().replace_window_tabs(window_id, tabs);
                if replaced {
                    self.persist_table().await;
                }
            }
            Err(e) => debug!(window_id, error = %e, "Could not refresh window tabs"),
        }
    }

    async fn patch_pinned(&self, window_id: i64, tab_id: i64, pinned: bool) {
        let workspace_id = {
            let mut table = self.table();
            table.set_tab_pinned(window_id, tab_id, pinned);
            match table.workspace_for_window(window_id) {
                Some(id) => id.to_string(),
                None => return,
            }
        };
        self.persist_table().await;

        let result: Result<bool, StorageError> = async {
            let mut workspaces = self.load_workspaces().await?;
            let tab = workspaces
                .iter_mut()
                .find(|w| w.id == workspace_id)
                .and_then(|w| w.tabs.iter_mut().find(|t| t.id == tab_id));
            match tab {
                Some(tab) if tab.pinned != pinned => {
                    tab.pinned = pinned;
                    self.save_workspaces(workspaces).await?;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
        .await;

        match result {
            Ok(true) => debug!(workspace_id = %workspace_id, tab_id, pinned, "Patched pinned flag"),
            Ok(false) => {}
            Err(e) => warn!(workspace_id = %workspace_id, error = %e, "Failed to patch pinned flag"),
        }
    }

    /// Captures the final tabs of a closed workspace window and marks it closed.
    async fn close_window(&self, window_id: i64) {
        let closed = {
            let mut table = self.table();
            let Some(workspace_id) = table.workspace_for_window(window_id).map(str::to_string) else {
                return;
            };
            table
                .deactivate(&workspace_id)
                .map(|(_, tabs)| (workspace_id, tabs))
        };
        let Some((workspace_id, final_tabs)) = closed else {
            return;
        };
        self.persist_table().await;

        let mut captured: Vec<WorkspaceTab> = final_tabs
            .iter()
            .filter_map(|tab| match create_workspace_tab(tab) {
                Ok(t) => Some(WorkspaceTab { id: TAB_ID_NONE, ..t }),
                Err(e) => {
                    warn!(window_id, error = %e, "Dropping untrackable tab");
                    None
                }
            })
            .collect();
        captured.sort_by_key(|t| t.index);

        let result: Result<(), StorageError> = async {
            let mut workspaces = self.load_workspaces().await?;
            if let Some(workspace) = workspaces.iter_mut().find(|w| w.id == workspace_id) {
                // An empty capture means we never saw the window's tabs; keep what we had.
                if captured.is_empty() {
                    for tab in &mut workspace.tabs {
                        tab.id = TAB_ID_NONE;
                    }
                } else {
                    workspace.tabs = captured;
                }
                workspace.window_id = None;
                self.save_workspaces(workspaces).await?;
            }
            Ok(())
        }
        .await;

        match result {
            Ok(()) => info!(workspace_id = %workspace_id, window_id, "Workspace window closed"),
            Err(e) => warn!(workspace_id = %workspace_id, error = %e, "Failed to save closed workspace"),
        }
    }

    /// Writes the cached tabs of every open workspace into the stored workspaces.
    pub async fn snapshot_open_workspaces(&self) -> Result<usize, StorageError> {
        let snapshot: Vec<(String, Vec<WorkspaceTab>)> = {
            let table = self.table();
            table
                .open_workspaces()
                .into_iter()
                .filter_map(|(workspace_id, window_id)| {
                    let tabs = table.window_tabs(window_id)?;
                    let mut converted: Vec<WorkspaceTab> = tabs
                        .iter()
                        .filter_map(|t| create_workspace_tab(t).ok())
                        .collect();
                    converted.sort_by_key(|t| t.index);
                    Some((workspace_id, converted))
                })
                .collect()
        };
        if snapshot.is_empty() {
            return Ok(0);
        }

        let mut workspaces = self.load_workspaces().await?;
        let mut updated = 0;
        for (workspace_id, tabs) in snapshot {
            if tabs.is_empty() {
                continue;
            }
            if let Some(workspace) = workspaces.iter_mut().find(|w| w.id == workspace_id) {
                workspace.tabs = tabs;
                updated += 1;
            }
        }
        if updated > 0 {
            self.save_workspaces(workspaces).await?;
        }
        Ok(updated)
    }
}

#[async_trait]
impl WorkspaceManagerTrait for WorkspaceManager {
    async fn open_by_id(&self, workspace_id: &str) -> Result<OpenOutcome, WorkspaceError> {
        let workspace = self
            .load_workspaces()
            .await?
            .into_iter()
            .find(|w| w.id == workspace_id)
            .ok_or_else(|| WorkspaceError::NotFound(workspace_id.to_string()))?;
        self.open(&workspace).await
    }

    async fn open(&self, workspace: &Workspace) -> Result<OpenOutcome, WorkspaceError> {
        validate_workspace(workspace)?;
        if let Some(window_id) = self.window_for_workspace(&workspace.id) {
            match self.browser.focus_window(window_id).await {
                Ok(()) => {
                    debug!(workspace_id = %workspace.id, window_id, "Focused existing workspace window");
                    return Ok(OpenOutcome {
                        window_id,
                        reused: true,
                    });
                }
                Err(e) => {
                    warn!(workspace_id = %workspace.id, window_id, error = %e,
                        "Tracked window is gone, opening a new one");
                    self.table().deactivate(&workspace.id);
                    self.persist_table().await;
                }
            }
        }

        let mut ordered = workspace.tabs.clone();
        ordered.sort_by_key(|t| t.index);

        let (window, mut opened) = self.create_window_with_tabs(&ordered).await?;
        let window_id = window.id;

        if !self.wait_window_ready(window_id).await {
            warn!(window_id, timeout_ms = self.config.ready_timeout_ms,
                "Window did not report ready in time, continuing");
        }

        for (stored, live) in &opened {
            if stored.pinned {
                if let Some(tab_id) = live.id {
                    self.spawn_pin(tab_id);
                }
            }
        }

        // Stored fields stay authoritative; only the live id changes.
        let tabs: Vec<WorkspaceTab> = ordered
            .iter()
            .map(|stored| {
                let id = opened
                    .iter()
                    .position(|(s, _)| s.index == stored.index && s.url == stored.url)
                    .map(|pos| opened.swap_remove(pos).1)
                    .and_then(|live| live.id)
                    .unwrap_or(TAB_ID_NONE);
                WorkspaceTab {
                    id,
                    ..stored.clone()
                }
            })
            .collect();

        let mut workspaces = self.load_workspaces().await?;
        let updated = match workspaces.iter_mut().find(|w| w.id == workspace.id) {
            Some(existing) => {
                existing.tabs = tabs;
                existing.last_opened = now_ms();
                existing.window_id = Some(window_id);
                existing.clone()
            }
            None => {
                let mut fresh = workspace.clone();
                fresh.tabs = tabs;
                fresh.last_opened = now_ms();
                fresh.window_id = Some(window_id);
                workspaces.push(fresh.clone());
                fresh
            }
        };
        self.save_workspaces(workspaces).await?;

        let live_tabs = match self.browser.query_tabs(window_id).await {
            Ok(tabs) => tabs,
            Err(e) => {
                warn!(window_id, error = %e, "Could not query new window, using creation results");
                window.tabs.clone()
            }
        };
        self.table().activate(&workspace.id, window_id, live_tabs);
        self.persist_table().await;

        self.apply_badge(window_id, &updated).await;

        info!(workspace_id = %workspace.id, window_id, tabs = updated.tabs.len(), "Workspace opened");
        Ok(OpenOutcome {
            window_id,
            reused: false,
        })
    }

    async fn list_workspaces(&self) -> Result<Vec<Workspace>, WorkspaceError> {
        Ok(self.load_workspaces().await?)
    }

    async fn create_workspace(&self, form: WorkspaceForm) -> Result<Workspace, WorkspaceError> {
        let workspace = create_workspace(form)?;
        let mut workspaces = self.load_workspaces().await?;
        if workspaces.iter().any(|w| w.id == workspace.id) {
            return Err(WorkspaceError::AlreadyExists(workspace.id));
        }
        workspaces.push(workspace.clone());
        self.save_workspaces(workspaces).await?;
        info!(workspace_id = %workspace.id, "Workspace created");
        Ok(workspace)
    }

    async fn edit_workspace(
        &self,
        workspace_id: &str,
        form: WorkspaceForm,
    ) -> Result<Workspace, WorkspaceError> {
        let name = form.name.trim().to_string();
        if name.is_empty() {
            return Err(WorkspaceError::InvalidField("name must not be empty".to_string()));
        }
        validate_color(&form.color)?;

        let mut workspaces = self.load_workspaces().await?;
        let workspace = workspaces
            .iter_mut()
            .find(|w| w.id == workspace_id)
            .ok_or_else(|| WorkspaceError::NotFound(workspace_id.to_string()))?;
        workspace.name = name;
        workspace.color = form.color;
        match form.password {
            Some(plain) if plain.is_empty() => clear_password(workspace),
            Some(plain) => set_password(workspace, plain, form.passpeek.unwrap_or_default()),
            None => {}
        }
        let updated = workspace.clone();
        self.save_workspaces(workspaces).await?;

        if let Some(window_id) = self.window_for_workspace(workspace_id) {
            self.apply_badge(window_id, &updated).await;
        }
        Ok(updated)
    }

    async fn delete_workspace(&self, workspace_id: &str) -> Result<(), WorkspaceError> {
        let mut workspaces = self.load_workspaces().await?;
        let before = workspaces.len();
        workspaces.retain(|w| w.id != workspace_id);
        if workspaces.len() == before {
            return Err(WorkspaceError::NotFound(workspace_id.to_string()));
        }
        self.save_workspaces(workspaces).await?;

        let was_open = self.table().deactivate(workspace_id).is_some();
        if was_open {
            self.persist_table().await;
        }
        info!(workspace_id, "Workspace deleted");
        Ok(())
    }

    async fn verify_password(
        &self,
        workspace_id: &str,
        attempt: &str,
    ) -> Result<bool, WorkspaceError> {
        let mut workspaces = self.load_workspaces().await?;
        let workspace = workspaces
            .iter_mut()
            .find(|w| w.id == workspace_id)
            .ok_or_else(|| WorkspaceError::NotFound(workspace_id.to_string()))?;

        if !workspace.has_password() {
            return Ok(true);
        }
        let now = now_ms();
        if workspace.is_locked(now) {
            return Err(WorkspaceError::Locked {
                until: workspace.lock_until.unwrap_or(now),
            });
        }

        let ok = CryptoService::new().verify_password(attempt, &workspace.password);
        if ok {
            workspace.failed_attempts = None;
            workspace.lock_until = None;
        } else {
            let failed = workspace.failed_attempts.unwrap_or(0) + 1;
            if failed >= self.config.max_failed_attempts {
                workspace.failed_attempts = None;
                workspace.lock_until = Some(now + self.config.lockout_ms);
                warn!(workspace_id, "Too many failed password attempts, workspace locked");
            } else {
                workspace.failed_attempts = Some(failed);
                workspace.lock_until = None;
            }
        }
        self.save_workspaces(workspaces).await?;
        Ok(ok)
    }
}
