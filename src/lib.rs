//! Tabspace: named, colored tab workspaces for the browser.
//!
//! The engine behind the extension: it opens workspaces as windows, reconciles
//! live window/tab events with the stored workspaces, syncs between the local
//! and sync stores and imports/exports workspace files. The browser itself is
//! reached through [`browser::BrowserApi`].

pub mod app;
pub mod browser;
pub mod database;
pub mod managers;
pub mod rpc_handler;
pub mod services;
pub mod types;
