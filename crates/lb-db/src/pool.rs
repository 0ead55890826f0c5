//! Connection pool management for SQLite via r2d2.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use lb_core::config::DatabaseConfig;
use lb_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// SQL name of the Unicode-aware lowercase function registered on every
/// connection. SQLite's built-in `lower()` only folds ASCII.
pub const UNICODE_LOWER: &str = "unicode_lower";

/// Register the crate's scalar functions on `conn`.
///
/// `unicode_lower(text)` returns `str::to_lowercase` of its argument and
/// passes NULL through.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

/// Initialize a database pool backed by a file on disk.
///
/// Creates the SQLite file if it does not exist, enables foreign keys and
/// WAL journal mode on every new connection, and runs pending migrations.
pub fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(&config.path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;",
        )?;
        register_functions(conn)
    });

    let pool = build_and_migrate(manager, config)?;

    tracing::info!(
        path = %config.path.display(),
        pool_size = config.pool_size,
        "Database pool ready"
    );

    Ok(pool)
}

/// Initialize an in-memory database pool with default sizing.
pub fn init_memory_pool() -> Result<DbPool> {
    init_memory_pool_with(&DatabaseConfig::default())
}

/// Initialize an in-memory database pool sized and timed by `config`.
///
/// `config.path` is ignored. Each call gets its own named shared-cache
/// database, so separate pools never see each other's rows while the
/// connections of one pool share state.
pub fn init_memory_pool_with(config: &DatabaseConfig) -> Result<DbPool> {
    static NEXT_DB: AtomicU64 = AtomicU64::new(0);
    let n = NEXT_DB.fetch_add(1, Ordering::Relaxed);
    let uri = format!("file:lightbnb_mem_{n}?mode=memory&cache=shared");

    let manager = SqliteConnectionManager::file(uri).with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        register_functions(conn)
    });

    build_and_migrate(manager, config)
}

fn build_and_migrate(manager: SqliteConnectionManager, config: &DatabaseConfig) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(Duration::from_secs(config.connection_timeout_secs))
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {e}")))?;

    let conn = get_conn(&pool)?;
    migrations::run_migrations(&conn)?;

    Ok(pool)
}

/// Convenience helper to get a connection from the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_pool_uses_default_size() {
        let pool = init_memory_pool().unwrap();
        assert_eq!(pool.max_size(), DatabaseConfig::default().pool_size);
    }

    #[test]
    fn memory_pool_honours_config_size() {
        let config = DatabaseConfig {
            pool_size: 2,
            ..Default::default()
        };
        let pool = init_memory_pool_with(&config).unwrap();
        assert_eq!(pool.max_size(), 2);
    }

    #[test]
    fn memory_pools_are_isolated() {
        let a = init_memory_pool().unwrap();
        let b = init_memory_pool().unwrap();
        get_conn(&a)
            .unwrap()
            .execute(
                "INSERT INTO users (name, email, password) VALUES ('A', 'a@example.com', 'x')",
                [],
            )
            .unwrap();
        let count: i64 = get_conn(&b)
            .unwrap()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn connections_enforce_foreign_keys() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let fk: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn unicode_lower_folds_accents() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let lowered: String = conn
            .query_row("SELECT unicode_lower('MONTRÉAL')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(lowered, "montréal");
        let null: Option<String> = conn
            .query_row("SELECT unicode_lower(NULL)", [], |row| row.get(0))
            .unwrap();
        assert!(null.is_none());
    }

    #[test]
    fn test_init_file_pool() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("bnb.db"),
            pool_size: 2,
            connection_timeout_secs: 5,
        };
        let pool = init_pool(&config).unwrap();
        assert_eq!(pool.max_size(), 2);
        assert!(config.path.exists());

        let conn = get_conn(&pool).unwrap();
        let lowered: String = conn
            .query_row("SELECT unicode_lower('ÎLE')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(lowered, "île");
    }

    #[test]
    fn test_unreachable_path_is_database_error() {
        let config = DatabaseConfig {
            path: "/nonexistent/dir/bnb.db".into(),
            pool_size: 1,
            connection_timeout_secs: 1,
        };
        let err = init_pool(&config).unwrap_err();
        assert!(err.is_database());
    }
}
