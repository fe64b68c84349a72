//! SQLite repository: connection pool, configuration and writes.

use std::fmt::Debug;
use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{BackendError, StorageError, StorageResult};
use crate::search::normalize::{fold_case, fold_text};
use crate::types::Record;

use super::schema;

pub(super) const BACKEND_NAME: &str = "sqlite";

/// SQLite-backed repository.
///
/// Every record lives in one `records` table as JSON text, keyed by
/// collection and id. Connections register two scalar functions,
/// `fold_text` and `fold_case`, used for substring matching.
pub struct SqliteRepository {
    pool: Pool<SqliteConnectionManager>,
    config: SqliteRepositoryConfig,
    is_memory: bool,
}

impl Debug for SqliteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRepository")
            .field("config", &self.config)
            .field("is_memory", &self.is_memory)
            .finish_non_exhaustive()
    }
}

/// Configuration for the SQLite repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqliteRepositoryConfig {
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of idle connections.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in milliseconds.
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,

    /// Enable WAL mode for file databases.
    #[serde(default = "default_true")]
    pub enable_wal: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout_ms() -> u64 {
    30000
}

fn default_busy_timeout_ms() -> u32 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for SqliteRepositoryConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout_ms: default_connection_timeout_ms(),
            busy_timeout_ms: default_busy_timeout_ms(),
            enable_wal: true,
        }
    }
}

impl SqliteRepository {
    /// Creates a new in-memory repository.
    pub fn in_memory() -> StorageResult<Self> {
        Self::with_config(":memory:", SqliteRepositoryConfig::default())
    }

    /// Opens or creates a file-based database.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::with_config(path, SqliteRepositoryConfig::default())
    }

    /// Creates a repository with custom configuration.
    ///
    /// An in-memory database lives in a single pooled connection that is
    /// never recycled, so its contents survive for the pool's lifetime.
    pub fn with_config<P: AsRef<Path>>(
        path: P,
        config: SqliteRepositoryConfig,
    ) -> StorageResult<Self> {
        let is_memory = path.as_ref().to_string_lossy() == ":memory:";
        let busy_timeout = Duration::from_millis(u64::from(config.busy_timeout_ms));
        let enable_wal = config.enable_wal && !is_memory;

        let manager = if is_memory {
            SqliteConnectionManager::memory()
        } else {
            SqliteConnectionManager::file(path.as_ref())
        }
        .with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            if enable_wal {
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
            }
            register_functions(conn)
        });

        let builder = Pool::builder()
            .connection_timeout(Duration::from_millis(config.connection_timeout_ms));
        let builder = if is_memory {
            builder
                .max_size(1)
                .min_idle(Some(1))
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            builder
                .max_size(config.max_connections)
                .min_idle(Some(config.min_connections))
        };

        let pool = builder.build(manager).map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: BACKEND_NAME.to_string(),
                message: e.to_string(),
            })
        })?;

        info!(
            path = %path.as_ref().display(),
            is_memory,
            "opened sqlite repository"
        );

        Ok(Self {
            pool,
            config,
            is_memory,
        })
    }

    /// Initialize the database schema.
    pub fn init_schema(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        schema::initialize_schema(&conn)
    }

    /// Get a connection from the pool.
    pub(crate) fn get_connection(
        &self,
    ) -> StorageResult<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: BACKEND_NAME.to_string(),
                message: e.to_string(),
            })
        })
    }

    /// Returns whether this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        self.is_memory
    }

    /// Returns the repository configuration.
    pub fn config(&self) -> &SqliteRepositoryConfig {
        &self.config
    }

    /// Checks that a connection can run a trivial query.
    pub fn health_check(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", [], |_| Ok(())).map_err(|e| {
            StorageError::Backend(BackendError::Unavailable {
                backend_name: BACKEND_NAME.to_string(),
                message: e.to_string(),
            })
        })
    }

    /// Inserts (or replaces) one record.
    pub fn insert(&self, collection: &str, value: Value) -> StorageResult<()> {
        let (id, content) = prepare(value)?;
        let conn = self.get_connection()?;
        conn.execute(UPSERT, params![collection, id, content])?;
        Ok(())
    }

    /// Inserts several records into one collection in a single transaction.
    ///
    /// Returns the number of records written.
    pub fn insert_many(&self, collection: &str, values: Vec<Value>) -> StorageResult<usize> {
        let rows = values
            .into_iter()
            .map(prepare)
            .collect::<StorageResult<Vec<_>>>()?;

        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(UPSERT)?;
            for (id, content) in &rows {
                stmt.execute(params![collection, id, content])?;
            }
        }
        tx.commit()?;

        debug!(collection, count = rows.len(), "inserted records");
        Ok(rows.len())
    }

    /// Returns the number of records in a collection.
    pub fn count(&self, collection: &str) -> StorageResult<usize> {
        let conn = self.get_connection()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM records WHERE collection = ?1",
            [collection],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

const UPSERT: &str = "INSERT INTO records (collection, id, content) VALUES (?1, ?2, ?3)
     ON CONFLICT(collection, id) DO UPDATE SET content = excluded.content";

fn prepare(value: Value) -> StorageResult<(String, String)> {
    let record = Record::from_value(value)?;
    let id = record
        .id()
        .ok_or_else(|| {
            StorageError::Backend(BackendError::SerializationError {
                message: "record is missing a string id".to_string(),
            })
        })?
        .to_string();
    let content = serde_json::to_string(&record)?;
    Ok((id, content))
}

/// Registers the folding functions on a connection.
pub(super) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;
    conn.create_scalar_function("fold_text", 1, flags, |ctx| {
        Ok(text_arg(ctx).map(|s| fold_text(&s)))
    })?;
    conn.create_scalar_function("fold_case", 1, flags, |ctx| {
        Ok(text_arg(ctx).map(|s| fold_case(&s)))
    })?;
    Ok(())
}

// Non-text arguments fold to NULL.
fn text_arg(ctx: &Context<'_>) -> Option<String> {
    match ctx.get_raw(0) {
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}
