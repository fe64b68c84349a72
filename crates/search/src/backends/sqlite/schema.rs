//! SQLite schema definitions.

use rusqlite::Connection;
use tracing::info;

use crate::error::{BackendError, StorageError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

fn schema_error(action: &str, e: rusqlite::Error) -> StorageError {
    StorageError::Backend(BackendError::MigrationError {
        message: format!("Failed to {}: {}", action, e),
    })
}

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
        info!(version = SCHEMA_VERSION, "created sqlite schema");
    } else if current_version > SCHEMA_VERSION {
        return Err(StorageError::Backend(BackendError::MigrationError {
            message: format!(
                "database schema version {} is newer than supported version {}",
                current_version, SCHEMA_VERSION
            ),
        }));
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| schema_error("create schema_version table", e))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| schema_error("clear schema_version", e))?;

    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )
    .map_err(|e| schema_error("set schema_version", e))?;

    Ok(())
}

/// Create the initial schema (version 1).
fn create_schema_v1(conn: &Connection) -> StorageResult<()> {
    // One row per JSON document
    conn.execute(
        "CREATE TABLE IF NOT EXISTS records (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            content TEXT NOT NULL CHECK (json_valid(content)),
            PRIMARY KEY (collection, id)
        )",
        [],
    )
    .map_err(|e| schema_error("create records table", e))?;

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_records_active ON records(collection, json_extract(content, '$.isActive'))",
        "CREATE INDEX IF NOT EXISTS idx_records_church ON records(collection, json_extract(content, '$.churchId'))",
    ];

    for index_sql in &indexes {
        conn.execute(index_sql, [])
            .map_err(|e| schema_error("create index", e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_initialization() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'records'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_rejects_invalid_json() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO records (collection, id, content) VALUES ('a', '1', 'not json')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_newer_schema() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        set_schema_version(&conn, SCHEMA_VERSION + 1).unwrap();
        assert!(initialize_schema(&conn).is_err());
    }
}
