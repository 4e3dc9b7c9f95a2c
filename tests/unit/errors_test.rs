use tabspace::types::errors::*;

// === WorkspaceError Tests ===

#[test]
fn workspace_error_display_variants() {
    assert_eq!(WorkspaceError::MissingTabId.to_string(), "Tab has no valid id");
    assert_eq!(
        WorkspaceError::NotFound("wid-1".to_string()).to_string(),
        "Workspace not found: wid-1"
    );
    assert_eq!(
        WorkspaceError::AlreadyExists("wid-2".to_string()).to_string(),
        "Workspace already exists: wid-2"
    );
    assert_eq!(
        WorkspaceError::InvalidField("bad color: red".to_string()).to_string(),
        "Invalid workspace field: bad color: red"
    );
    assert_eq!(
        WorkspaceError::Locked { until: 42 }.to_string(),
        "Workspace is locked until 42"
    );
}

#[test]
fn workspace_error_wraps_lower_layers() {
    let err: WorkspaceError = StorageError::Unavailable("quota".to_string()).into();
    assert_eq!(err.to_string(), "Workspace storage error: Storage unavailable: quota");

    let err: WorkspaceError = BrowserError::WindowNotFound(7).into();
    assert_eq!(err.to_string(), "Workspace browser error: Window not found: 7");
}

#[test]
fn workspace_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(WorkspaceError::MissingTabId);
    assert!(err.source().is_none());
}

// === BrowserError Tests ===

#[test]
fn browser_error_display_variants() {
    assert_eq!(BrowserError::WindowNotFound(3).to_string(), "Window not found: 3");
    assert_eq!(BrowserError::TabNotFound(9).to_string(), "Tab not found: 9");
    assert_eq!(
        BrowserError::Api("No tab with id".to_string()).to_string(),
        "Browser API error: No tab with id"
    );
}

// === StorageError Tests ===

#[test]
fn storage_error_display_variants() {
    assert_eq!(
        StorageError::DatabaseError("locked".to_string()).to_string(),
        "Storage database error: locked"
    );
    assert_eq!(
        StorageError::SerializationError("eof".to_string()).to_string(),
        "Storage serialization error: eof"
    );
}

#[test]
fn storage_error_from_serde_json() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: StorageError = json_err.into();
    assert!(matches!(err, StorageError::SerializationError(_)));
}

#[test]
fn storage_error_from_rusqlite() {
    let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, StorageError::DatabaseError(_)));
}

// === CodecError / ImportError / ConfigError Tests ===

#[test]
fn codec_error_display_variants() {
    assert_eq!(
        CodecError::Decode("bad base64".to_string()).to_string(),
        "Codec decode error: bad base64"
    );
    assert_eq!(
        CodecError::UnsupportedVersion(9).to_string(),
        "Unsupported codec version: 9"
    );
}

#[test]
fn import_error_display_variants() {
    assert_eq!(
        ImportError::Parse("line 1".to_string()).to_string(),
        "Import file is not valid JSON: line 1"
    );
    assert_eq!(
        ImportError::InvalidPayload("no workspaces".to_string()).to_string(),
        "Invalid import data: no workspaces"
    );
    let err: ImportError = StorageError::Unavailable("closed".to_string()).into();
    assert_eq!(err.to_string(), "Import storage error: Storage unavailable: closed");
}

#[test]
fn config_error_display_variants() {
    assert_eq!(
        ConfigError::IoError("denied".to_string()).to_string(),
        "Config I/O error: denied"
    );
    assert_eq!(
        ConfigError::SerializationError("trailing comma".to_string()).to_string(),
        "Config serialization error: trailing comma"
    );
}
