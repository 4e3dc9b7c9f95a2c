use serde::{Deserialize, Serialize};

/// User-facing settings, persisted and synced alongside the workspaces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Settings {
    pub theme: ThemeMode,
    pub sync: SyncMode,
}

/// Theme mode selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Light,
    Dark,
}

/// Whether local data is periodically copied to the sync store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    On,
    #[default]
    Off,
}

impl SyncMode {
    pub fn is_on(self) -> bool {
        self == SyncMode::On
    }
}

impl From<bool> for SyncMode {
    fn from(on: bool) -> Self {
        if on {
            SyncMode::On
        } else {
            SyncMode::Off
        }
    }
}
