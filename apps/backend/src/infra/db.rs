//! Database connection and schema bootstrap for the SeaORM room store.

use std::future::Future;
use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend};
use tracing::{info, warn};

use crate::config::db::{backend_kind, DbBackendKind};
use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_INTERVAL_MS: u64 = 500;

const SQLITE_SCHEMA: &[&str] = &[
    "PRAGMA foreign_keys = ON;",
    "CREATE TABLE IF NOT EXISTS rooms (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        started BOOLEAN NOT NULL DEFAULT 0,
        winner TEXT NULL,
        player_count INTEGER NOT NULL DEFAULT 0,
        document TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        lock_version INTEGER NOT NULL DEFAULT 1
    );",
];

const POSTGRES_SCHEMA: &[&str] = &[
    "SET timezone = 'UTC';",
    "CREATE TABLE IF NOT EXISTS rooms (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        started BOOLEAN NOT NULL DEFAULT FALSE,
        winner TEXT NULL,
        player_count INTEGER NOT NULL DEFAULT 0,
        document TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        lock_version INTEGER NOT NULL DEFAULT 1
    );",
];

/// Retry a connection attempt with fixed interval delays.
/// Returns the result of the last attempt after all retries are exhausted.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    warn!(attempt, max_attempts, interval_ms, "connection_retry=failed");
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| AppError::db_unavailable("connection retry failed")))
}

/// Connect to `url`. In-memory SQLite is pinned to a single connection so
/// every query sees the same database.
pub async fn connect_db(url: &str) -> Result<DatabaseConnection, AppError> {
    let kind = backend_kind(url)?;
    let in_memory = kind == DbBackendKind::Sqlite && url.contains(":memory:");

    retry_connection(
        || {
            let mut opts = ConnectOptions::new(url.to_owned());
            opts.sqlx_logging(false);
            if in_memory {
                opts.max_connections(1).min_connections(1);
            }
            async move { Database::connect(opts).await.map_err(AppError::from) }
        },
        CONNECT_ATTEMPTS,
        CONNECT_RETRY_INTERVAL_MS,
    )
    .await
}

/// Create the rooms table if it does not exist. Safe to run repeatedly.
pub async fn bootstrap_schema(conn: &DatabaseConnection) -> Result<(), AppError> {
    let statements = match conn.get_database_backend() {
        DbBackend::Sqlite => SQLITE_SCHEMA,
        DbBackend::Postgres => POSTGRES_SCHEMA,
        other => {
            return Err(AppError::config(format!(
                "Unsupported database backend {other:?}"
            )))
        }
    };
    for stmt in statements {
        conn.execute_unprepared(stmt).await?;
    }
    info!(backend = ?conn.get_database_backend(), "schema_bootstrap=complete");
    Ok(())
}

/// Connect and bootstrap in one step.
pub async fn bootstrap_db(url: &str) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(url).await?;
    bootstrap_schema(&conn).await?;
    Ok(conn)
}
