use serde::{Deserialize, Deserializer, Serialize};

use super::browser::TAB_ID_NONE;

/// A named, colored group of tabs that outlives the window showing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub color: String,
    pub tabs: Vec<WorkspaceTab>,
    pub created_at: i64,
    pub last_opened: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<i64>,
    /// Empty when unprotected, otherwise the SHA-256 hex digest.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub passpeek: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_until: Option<i64>,
}

impl Workspace {
    /// Tabs flagged as pinned, in stored order.
    pub fn pinned_tabs(&self) -> Vec<&WorkspaceTab> {
        self.tabs.iter().filter(|t| t.pinned).collect()
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    pub fn is_locked(&self, now: i64) -> bool {
        self.lock_until.map_or(false, |until| until > now)
    }
}

/// One tab of a workspace. `id` is only meaningful while the window is open.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceTab {
    #[serde(default = "no_tab_id", deserialize_with = "tab_id_or_none")]
    pub id: i64,
    pub index: i64,
    pub title: String,
    pub url: String,
    pub pinned: bool,
}

fn no_tab_id() -> i64 {
    TAB_ID_NONE
}

/// Older exports wrote a closed tab's id as NaN, which JSON turns into `null`.
fn tab_id_or_none<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(TAB_ID_NONE))
}

/// Fields a caller supplies when creating or editing a workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceForm {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub passpeek: Option<String>,
}
