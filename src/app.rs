//! App Core for Tabspace.
//!
//! Central struct holding storage, the browser handle, the workspace manager
//! and the sync scheduler, managing the engine lifecycle.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};

use crate::browser::BrowserApi;
use crate::database::connection::Database;
use crate::managers::workspace_manager::{StartupSource, WorkspaceManager};
use crate::services::kv_store::{SqliteStore, StoreArea};
use crate::services::storage::Storage;
use crate::services::sync_scheduler::SyncScheduler;
use crate::types::browser::{CreateWindowOptions, WindowKind};
use crate::types::config::EngineConfig;
use crate::types::errors::{BrowserError, StorageError};
use crate::types::persist::{PersistPatch, StorageKey};
use crate::types::settings::{Settings, SyncMode};

pub const PRODUCT_NAME: &str = "tabspace";

/// Auxiliary extension pages opened as popup windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Import,
    Export,
    Settings,
}

impl Page {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "import" => Some(Page::Import),
            "export" => Some(Page::Export),
            "settings" => Some(Page::Settings),
            _ => None,
        }
    }

    pub fn url(self) -> &'static str {
        match self {
            Page::Import => "pages/import.html",
            Page::Export => "pages/export.html",
            Page::Settings => "pages/settings.html",
        }
    }

    /// (width, height) of the popup.
    pub fn size(self) -> (u32, u32) {
        match self {
            Page::Import | Page::Export => (400, 300),
            Page::Settings => (420, 520),
        }
    }
}

/// An export ready to be written to disk by the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub data: String,
}

/// `tabspace-workspaces-YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{}-workspaces-{}.json", PRODUCT_NAME, date.format("%Y-%m-%d"))
}

/// Central application struct holding all managers and services.
pub struct App {
    pub config: EngineConfig,
    pub storage: Arc<Storage>,
    pub browser: Arc<dyn BrowserApi>,
    pub workspace_manager: Arc<WorkspaceManager>,
    pub sync_scheduler: SyncScheduler,
}

impl App {
    /// Creates an App whose local and sync areas live in the SQLite file at `db_path`.
    pub fn new(
        db_path: &str,
        browser: Arc<dyn BrowserApi>,
        config: EngineConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        let storage = Storage::new(
            Arc::new(SqliteStore::new(db.clone(), StoreArea::Local)),
            Arc::new(SqliteStore::new(db, StoreArea::Sync)),
        );
        Ok(Self::with_storage(Arc::new(storage), browser, config))
    }

    pub fn with_storage(storage: Arc<Storage>, browser: Arc<dyn BrowserApi>, config: EngineConfig) -> Self {
        let workspace_manager = Arc::new(WorkspaceManager::new(
            browser.clone(),
            storage.clone(),
            config.clone(),
        ));
        let sync_scheduler = SyncScheduler::new(storage.clone(), config.sync_interval_minutes);
        Self {
            config,
            storage,
            browser,
            workspace_manager,
            sync_scheduler,
        }
    }

    /// Startup sequence: arbitrate local vs sync, reset window tracking, resume sync.
    pub async fn startup(&self) -> Result<StartupSource, StorageError> {
        let (source, settings) = self.workspace_manager.initialize().await?;
        if settings.sync.is_on() {
            self.sync_scheduler.start();
        }
        Ok(source)
    }

    /// Shutdown sequence: stop the sync loop.
    pub fn shutdown(&self) {
        self.sync_scheduler.stop();
    }

    pub async fn settings(&self) -> Result<Settings, StorageError> {
        let data = self.storage.local_get(&[StorageKey::Settings]).await?;
        Ok(data.settings.unwrap_or_default())
    }

    pub async fn save_settings(&self, settings: Settings) -> Result<(), StorageError> {
        let sync_on = settings.sync.is_on();
        self.storage
            .local_persist_set(PersistPatch {
                workspaces: None,
                settings: Some(settings),
            })
            .await?;
        if sync_on {
            self.sync_scheduler.start();
        } else {
            self.sync_scheduler.stop();
        }
        Ok(())
    }

    /// Turns periodic sync on or off; turning it on also syncs immediately.
    pub async fn toggle_sync(&self, on: bool) -> Result<(), StorageError> {
        let mut settings = self.settings().await?;
        settings.sync = SyncMode::from(on);
        self.save_settings(settings).await?;

        if on {
            // A failure here is already reported on the status channel.
            if let Err(e) = self.sync_scheduler.sync_now().await {
                warn!(error = %e, "Initial sync failed");
            }
        }
        info!(on, "Sync toggled");
        Ok(())
    }

    /// Snapshots open windows and serializes the local data as the export file.
    pub async fn export(&self) -> Result<ExportFile, StorageError> {
        let snapshotted = self.workspace_manager.snapshot_open_workspaces().await?;
        let persist = self.storage.local_persist().await?;
        let data = serde_json::to_string_pretty(&persist)?;
        info!(workspaces = persist.workspaces.len(), snapshotted, "Export prepared");
        Ok(ExportFile {
            file_name: export_file_name(Local::now().date_naive()),
            data,
        })
    }

    /// Opens an auxiliary page in a popup window sized for it.
    pub async fn open_page(&self, page: Page) -> Result<i64, BrowserError> {
        let (width, height) = page.size();
        let window = self
            .browser
            .create_window(CreateWindowOptions {
                url: Some(page.url().to_string()),
                focused: true,
                kind: WindowKind::Popup,
                width: Some(width),
                height: Some(height),
            })
            .await?;
        Ok(window.id)
    }
}
