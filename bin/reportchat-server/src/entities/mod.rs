//! SQLite persistence for users, analysis sessions and chat messages.
//!
//! Each entity module adds its sqlx-level operations to [`SqliteStore`] and
//! implements the matching `reportchat_core::service` trait on top of them,
//! so handlers only ever see the core traits.
//!
//! The `sqlx::query` (runtime-verified) form is used so that no
//! `DATABASE_URL` environment variable is needed at compile time.

pub mod chat;
pub mod dao;
pub mod session;
pub mod user;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use reportchat_core::CoreError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g.
    /// `"sqlite://reportchat.db?mode=rwc"`.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::migrate(pool).await
    }

    /// Private in-memory database on a single connection, for tests.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

/// Map a sqlx failure into the core error, logging the detail here since the
/// core type only carries a string.
pub(crate) fn storage_error(e: sqlx::Error) -> CoreError {
    tracing::error!(error = %e, "store operation failed");
    CoreError::Storage(e.to_string())
}

pub(crate) fn parse_timestamp(raw: &str, column: &'static str) -> DateTime<Utc> {
    raw.parse().unwrap_or_else(|e: chrono::ParseError| {
        tracing::warn!(raw = %raw, column, error = %e, "failed to parse timestamp; using now");
        Utc::now()
    })
}
