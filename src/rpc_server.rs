//! Tabspace host bridge: newline-delimited JSON over stdin/stdout.
//!
//! Command: {"id":1, "action":"open", "payload":{"workspaceId":"wid-..."}}
//! Reply:   {"id":1, "response":{"succ":true, ...}}
//! Event:   {"event":{"type":"windowRemoved","windowId":7}}
//! Status:  {"event":"syncStatus", "data":{"status":"success"}}
//!
//! Commands run concurrently, so replies may come back out of order; match
//! them by `id`. Logs go to stderr; stdout carries only protocol lines.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tabspace::app::App;
use tabspace::browser::MockBrowser;
use tabspace::rpc_handler::{route_line, spawn_sync_status_forwarder};
use tabspace::types::config::EngineConfig;

const CONFIG_FILE: &str = "tabspace.json";
const DB_FILE: &str = "tabspace.db";

/// Prefer TABSPACE_DATA_DIR, fall back to the executable's directory.
fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TABSPACE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

async fn write_line(out: &mut tokio::io::Stdout, value: &Value) -> std::io::Result<()> {
    out.write_all(value.to_string().as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

/// Owns stdout; every protocol line goes through here so lines never interleave.
fn spawn_writer(mut lines: UnboundedReceiver<Value>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = lines.recv().await {
            if let Err(e) = write_line(&mut stdout, &line).await {
                error!(error = %e, "Failed to write to stdout");
                break;
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TABSPACE_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_dir = resolve_data_dir();
    let config = EngineConfig::load(data_dir.join(CONFIG_FILE))?;
    let db_path = config.data_dir.clone().unwrap_or(data_dir).join(DB_FILE);
    let db_path = db_path.to_str().ok_or("data directory is not valid UTF-8")?;

    let (browser, browser_events) = MockBrowser::new();
    let app = Arc::new(App::new(db_path, Arc::new(browser), config)?);
    let source = app.startup().await?;

    let (host_events, host_event_rx) = unbounded_channel();
    let browser_pump = app.workspace_manager.spawn_event_pump(browser_events);
    let host_pump = app.workspace_manager.spawn_event_pump(host_event_rx);

    let (out, out_rx) = unbounded_channel();
    let writer = spawn_writer(out_rx);
    let status_forwarder = spawn_sync_status_forwarder(&app, out.clone());
    info!(db = db_path, source = ?source, "Tabspace host started");

    if out
        .send(json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}))
        .is_err()
    {
        return Err("stdout writer stopped before startup finished".into());
    }

    let mut commands: Vec<JoinHandle<()>> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if writer.is_finished() {
            warn!("Output closed, stopping");
            break;
        }
        commands.retain(|c| !c.is_finished());
        if let Some(command) = route_line(&app, &line, &host_events, &out) {
            commands.push(command);
        }
    }

    // Let in-flight commands answer before the writer goes away.
    for command in commands {
        if let Err(e) = command.await {
            warn!(error = %e, "Command task failed");
        }
    }
    app.shutdown();
    status_forwarder.abort();
    browser_pump.abort();
    host_pump.abort();
    drop(out);
    if let Err(e) = writer.await {
        warn!(error = %e, "Writer task failed");
    }
    info!("Tabspace host exiting");
    Ok(())
}
