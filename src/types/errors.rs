use std::fmt;

// === WorkspaceError ===

/// Errors related to workspace and workspace tab operations.
#[derive(Debug)]
pub enum WorkspaceError {
    /// The raw browser tab carries no usable id, so it cannot be tracked.
    MissingTabId,
    /// Workspace with the given ID was not found.
    NotFound(String),
    /// A workspace with the given ID already exists.
    AlreadyExists(String),
    /// A field value was rejected (name, color, ...).
    InvalidField(String),
    /// The workspace is locked after too many failed password attempts.
    Locked { until: i64 },
    /// Persisting the workspace failed.
    Storage(StorageError),
    /// The browser refused an operation that could not be degraded.
    Browser(BrowserError),
}

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceError::MissingTabId => write!(f, "Tab has no valid id"),
            WorkspaceError::NotFound(id) => write!(f, "Workspace not found: {}", id),
            WorkspaceError::AlreadyExists(id) => write!(f, "Workspace already exists: {}", id),
            WorkspaceError::InvalidField(msg) => write!(f, "Invalid workspace field: {}", msg),
            WorkspaceError::Locked { until } => {
                write!(f, "Workspace is locked until {}", until)
            }
            WorkspaceError::Storage(e) => write!(f, "Workspace storage error: {}", e),
            WorkspaceError::Browser(e) => write!(f, "Workspace browser error: {}", e),
        }
    }
}

impl std::error::Error for WorkspaceError {}

impl From<StorageError> for WorkspaceError {
    fn from(e: StorageError) -> Self {
        WorkspaceError::Storage(e)
    }
}

impl From<BrowserError> for WorkspaceError {
    fn from(e: BrowserError) -> Self {
        WorkspaceError::Browser(e)
    }
}

// === BrowserError ===

/// Errors reported by the host browser's window/tab API.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserError {
    /// Window with the given ID does not exist (anymore).
    WindowNotFound(i64),
    /// Tab with the given ID does not exist (anymore).
    TabNotFound(i64),
    /// Any other failure surfaced by the browser.
    Api(String),
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::WindowNotFound(id) => write!(f, "Window not found: {}", id),
            BrowserError::TabNotFound(id) => write!(f, "Tab not found: {}", id),
            BrowserError::Api(msg) => write!(f, "Browser API error: {}", msg),
        }
    }
}

impl std::error::Error for BrowserError {}

// === StorageError ===

/// Errors related to the local/sync key-value stores.
#[derive(Debug)]
pub enum StorageError {
    /// Database operation failed.
    DatabaseError(String),
    /// A stored value could not be (de)serialized.
    SerializationError(String),
    /// The backend is unavailable (quota, closed, ...).
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::SerializationError(e.to_string())
    }
}

// === CodecError ===

/// Errors raised while packing or unpacking the compact sync payload.
#[derive(Debug)]
pub enum CodecError {
    /// Building the compact form failed.
    Encode(String),
    /// The input is not a valid compact payload.
    Decode(String),
    /// The payload was written by an unknown format version.
    UnsupportedVersion(i64),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Encode(msg) => write!(f, "Codec encode error: {}", msg),
            CodecError::Decode(msg) => write!(f, "Codec decode error: {}", msg),
            CodecError::UnsupportedVersion(v) => {
                write!(f, "Unsupported codec version: {}", v)
            }
        }
    }
}

impl std::error::Error for CodecError {}

// === ImportError ===

/// Errors related to importing an exported workspace file.
#[derive(Debug)]
pub enum ImportError {
    /// The payload is not valid JSON.
    Parse(String),
    /// The payload does not have the expected shape.
    InvalidPayload(String),
    /// Writing the merged result failed.
    Storage(StorageError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Parse(msg) => write!(f, "Import file is not valid JSON: {}", msg),
            ImportError::InvalidPayload(msg) => write!(f, "Invalid import data: {}", msg),
            ImportError::Storage(e) => write!(f, "Import storage error: {}", e),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<StorageError> for ImportError {
    fn from(e: StorageError) -> Self {
        ImportError::Storage(e)
    }
}

// === ConfigError ===

/// Errors related to loading the engine configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// File I/O error.
    IoError(String),
    /// The file is not valid JSON for the config schema.
    SerializationError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::SerializationError(msg) => {
                write!(f, "Config serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
