use serde::{Deserialize, Serialize};

/// Id the browser reports for "no tab". Closed workspaces keep this in `WorkspaceTab::id`.
pub const TAB_ID_NONE: i64 = -1;

/// A live tab as reported by the browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserTab {
    #[serde(default)]
    pub id: Option<i64>,
    pub window_id: i64,
    pub index: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub active: bool,
}

/// A browser window with the tabs it held at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserWindow {
    pub id: i64,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub tabs: Vec<BrowserTab>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    #[default]
    Normal,
    Popup,
}

/// Arguments for creating a window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateWindowOptions {
    pub url: Option<String>,
    pub focused: bool,
    pub kind: WindowKind,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Arguments for creating a tab in an existing window.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTabOptions {
    pub window_id: i64,
    pub url: String,
    pub index: Option<i64>,
    pub active: bool,
}

/// The subset of a tab-updated change payload the engine looks at.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabChangeInfo {
    #[serde(default)]
    pub pinned: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TabChangeInfo {
    /// True when the only thing that changed is the pinned flag.
    pub fn is_pinned_only(&self) -> bool {
        self.pinned.is_some() && self.url.is_none() && self.title.is_none() && self.status.is_none()
    }
}

/// Text and colors shown on a workspace window's badge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub text: String,
    pub background_color: String,
    pub text_color: String,
}

/// Window and tab lifecycle events delivered by the browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BrowserEvent {
    TabCreated {
        tab: BrowserTab,
    },
    #[serde(rename_all = "camelCase")]
    TabUpdated {
        tab_id: i64,
        change: TabChangeInfo,
        tab: BrowserTab,
    },
    #[serde(rename_all = "camelCase")]
    TabMoved {
        tab_id: i64,
        window_id: i64,
    },
    #[serde(rename_all = "camelCase")]
    TabAttached {
        tab_id: i64,
        new_window_id: i64,
    },
    #[serde(rename_all = "camelCase")]
    TabDetached {
        tab_id: i64,
        old_window_id: i64,
    },
    #[serde(rename_all = "camelCase")]
    TabRemoved {
        tab_id: i64,
        window_id: i64,
        is_window_closing: bool,
    },
    #[serde(rename_all = "camelCase")]
    WindowRemoved {
        window_id: i64,
    },
}
