//! Unit tests for the Tabspace database layer (connection + migrations).

use tabspace::database::migrations::{get_schema_version, run_all, CURRENT_SCHEMA_VERSION};
use tabspace::database::Database;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_kv_store() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='kv_store'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);
    assert!(exists, "kv_store should exist after migrations");
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    assert_eq!(get_schema_version(&db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let result = run_all(&db.connection());
    assert!(result.is_ok(), "Running migrations twice should succeed");
    assert_eq!(get_schema_version(&db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_kv_store_schema() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    conn.execute(
        "INSERT INTO kv_store (area, key, value, updated_at) VALUES ('local', 'timestamp', '5', 1)",
        [],
    )
    .expect("Should be able to insert into kv_store");

    // Same key in another area is a separate row.
    conn.execute(
        "INSERT INTO kv_store (area, key, value) VALUES ('sync', 'timestamp', '7')",
        [],
    )
    .expect("Areas should partition keys");

    let value: String = conn
        .query_row(
            "SELECT value FROM kv_store WHERE area = 'sync' AND key = 'timestamp'",
            [],
            |row| row.get(0),
        )
        .expect("Should be able to query kv_store");
    assert_eq!(value, "7");
}

#[test]
fn test_open_file_database() {
    let tmp = tempfile::TempDir::new().expect("Failed to create temp dir");
    let db_path = tmp.path().join("tabspace.db");

    let db = Database::open(&db_path);
    assert!(db.is_ok(), "open with file path should succeed");
    assert!(db_path.exists(), "Database file should exist on disk");
}
