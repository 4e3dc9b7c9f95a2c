//! The host browser's window/tab API, as seen by the engine.
//!
//! Every call is a suspension point; the browser may reject any of them at any
//! time (window closed under us, tab still initializing, bad URL).

pub mod mock;

use async_trait::async_trait;

use crate::types::browser::{Badge, BrowserTab, BrowserWindow, CreateTabOptions, CreateWindowOptions};
use crate::types::errors::BrowserError;

#[async_trait]
pub trait BrowserApi: Send + Sync {
    async fn create_window(&self, options: CreateWindowOptions) -> Result<BrowserWindow, BrowserError>;
    async fn focus_window(&self, window_id: i64) -> Result<(), BrowserError>;
    async fn create_tab(&self, options: CreateTabOptions) -> Result<BrowserTab, BrowserError>;
    async fn get_tab(&self, tab_id: i64) -> Result<BrowserTab, BrowserError>;
    async fn set_tab_pinned(&self, tab_id: i64, pinned: bool) -> Result<BrowserTab, BrowserError>;
    /// Live tabs of a window, ordered by index.
    async fn query_tabs(&self, window_id: i64) -> Result<Vec<BrowserTab>, BrowserError>;
    async fn set_badge(&self, window_id: i64, badge: &Badge) -> Result<(), BrowserError>;
}

pub use mock::MockBrowser;
