//! # SQLite database methods
//!
//! This module contains the "low-level" SQLite interactions.
//!
//! All of these interactions are maintained by simple functions (rather than stateful structs) that accept
//! a `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or open a transaction
//! as the need arises, and call through to the functions without any other changes.
use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod records;
pub mod users;

const SQLITE_DB_URL: &str = "sqlite://data/sdg_store.db";

pub fn db_url() -> String {
    let result = env::var("SDG_DATABASE_URL").unwrap_or_else(|_| {
        info!("SDG_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// The gateway owns its schema outright, so it is applied idempotently when the pool is created rather
/// than through a migration tool.
async fn create_schema(pool: &SqlitePool) -> Result<(), SqlxError> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS user_records (
            uid        TEXT PRIMARY KEY NOT NULL,
            email      TEXT,
            created_at TEXT NOT NULL,
            last_login TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS data_records (
            id         TEXT PRIMARY KEY NOT NULL,
            user_id    TEXT NOT NULL,
            payload    TEXT NOT NULL,
            created_at TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS data_records_owner_idx ON data_records (user_id, created_at DESC)")
        .execute(pool)
        .await?;
    Ok(())
}
