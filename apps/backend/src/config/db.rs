use std::env;

use crate::error::AppError;

pub const DATABASE_URL_VAR: &str = "LUDO_DATABASE_URL";

/// Which SQL backend a connection URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbBackendKind {
    Postgres,
    Sqlite,
}

/// Database URL for the SeaORM room store, from `LUDO_DATABASE_URL`.
pub fn db_url() -> Result<String, AppError> {
    let url = must_var(DATABASE_URL_VAR)?;
    backend_kind(&url)?;
    Ok(url)
}

pub fn backend_kind(url: &str) -> Result<DbBackendKind, AppError> {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(DbBackendKind::Postgres)
    } else if url.starts_with("sqlite:") {
        Ok(DbBackendKind::Sqlite)
    } else {
        Err(AppError::config(format!(
            "Unsupported database URL scheme in '{DATABASE_URL_VAR}'"
        )))
    }
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
