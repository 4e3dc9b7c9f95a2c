//! Periodic copy of local data to the sync store.
//!
//! The loop sleeps until the next wall-clock boundary (minutes-since-hour a
//! multiple of the interval), copies, reports, and reschedules itself. It is
//! re-aligned on every cycle, so it survives sleep/wake without drifting.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Timelike};
use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::services::storage::Storage;
use crate::types::errors::StorageError;
use crate::types::persist::Persist;

/// Status broadcast to every open view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum SyncStatus {
    Syncing,
    Success,
    Error(String),
}

/// Time left until minutes-since-hour is next a multiple of `interval_minutes`.
pub fn delay_until_next_boundary<Tz: TimeZone>(now: &DateTime<Tz>, interval_minutes: u32) -> Duration {
    let interval = interval_minutes.clamp(1, 60);
    let minute = now.minute();
    let next = ((minute / interval + 1) * interval).min(60);

    let into_minute_ms = now.second() as u64 * 1000 + (now.nanosecond() / 1_000_000).min(999) as u64;
    let until_ms = (next - minute) as u64 * 60_000 - into_minute_ms;
    Duration::from_millis(until_ms)
}

/// Copies the local workspaces and settings to the sync store once.
pub async fn sync_once(storage: &Storage) -> Result<i64, StorageError> {
    let local = storage.local_persist().await?;
    storage
        .sync_set(Persist {
            timestamp: 0,
            workspaces: local.workspaces,
            settings: local.settings,
        })
        .await
}

struct Running {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct SyncScheduler {
    storage: Arc<Storage>,
    interval_minutes: u32,
    status: broadcast::Sender<SyncStatus>,
    running: Mutex<Option<Running>>,
}

impl SyncScheduler {
    pub fn new(storage: Arc<Storage>, interval_minutes: u32) -> Self {
        let (status, _) = broadcast::channel(16);
        Self {
            storage,
            interval_minutes,
            status,
            running: Mutex::new(None),
        }
    }

    fn running(&self) -> MutexGuard<'_, Option<Running>> {
        self.running.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running()
            .as_ref()
            .map_or(false, |r| !r.handle.is_finished())
    }

    fn report(status: &broadcast::Sender<SyncStatus>, s: SyncStatus) {
        // No open view is not an error.
        let _ = status.send(s);
    }

    /// Runs one copy now and reports its outcome.
    pub async fn sync_now(&self) -> Result<i64, StorageError> {
        Self::run_cycle(&self.storage, &self.status).await
    }

    async fn run_cycle(
        storage: &Storage,
        status: &broadcast::Sender<SyncStatus>,
    ) -> Result<i64, StorageError> {
        Self::report(status, SyncStatus::Syncing);
        match sync_once(storage).await {
            Ok(stamp) => {
                Self::report(status, SyncStatus::Success);
                info!(timestamp = stamp, "Synced workspaces");
                Ok(stamp)
            }
            Err(e) => {
                warn!(error = %e, "Sync failed");
                Self::report(status, SyncStatus::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Starts the loop. Returns false if one is already scheduled.
    pub fn start(&self) -> bool {
        let mut running = self.running();
        if running.as_ref().map_or(false, |r| !r.handle.is_finished()) {
            return false;
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let storage = Arc::clone(&self.storage);
        let status = self.status.clone();
        let interval = self.interval_minutes;

        let handle = tokio::spawn(async move {
            loop {
                let delay = delay_until_next_boundary(&Local::now(), interval);
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = stop_rx.changed() => break,
                }
                // Once started, a copy runs to completion even if stop arrives meanwhile.
                let _ = Self::run_cycle(&storage, &status).await;
                if *stop_rx.borrow() {
                    break;
                }
            }
            info!("Sync scheduler stopped");
        });

        *running = Some(Running {
            stop: stop_tx,
            handle,
        });
        info!(interval_minutes = interval, "Sync scheduler started");
        true
    }

    /// Cancels the pending wake. Returns false if nothing was scheduled.
    pub fn stop(&self) -> bool {
        match self.running().take() {
            Some(running) => {
                let _ = running.stop.send(true);
                true
            }
            None => false,
        }
    }
}
