//! `SqliteDatabase` is the bundled document store backend for the gateway.
//!
//! Unsurprisingly, it uses SQLite underneath and implements the traits defined in the [`crate::traits`]
//! module. The store is assumed safe for concurrent use; the pool hands each operation its own connection.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{new_pool, records, users};
use crate::{
    db_types::{DataRecord, UserRecord},
    traits::{DataStore, StoreError, UserStore},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connect to the database at `url`, creating the schema if needed.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

impl UserStore for SqliteDatabase {
    async fn fetch_user(&self, uid: &str) -> Result<Option<UserRecord>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::user_by_uid(uid, &mut conn).await
    }

    async fn create_user_if_absent(&self, user: &UserRecord) -> Result<UserRecord, StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user_if_absent(user, &mut conn).await?;
        // Re-read rather than returning `user`: if a concurrent request won the conditional put, the
        // stored record is the one every caller must observe.
        users::user_by_uid(&user.uid, &mut conn)
            .await?
            .ok_or_else(|| StoreError::DatabaseError(format!("Profile for {} vanished after conditional put", user.uid)))
    }
}

impl DataStore for SqliteDatabase {
    async fn insert_record(&self, record: &DataRecord) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        records::insert_record(record, &mut conn).await
    }

    async fn fetch_records_for_user(&self, uid: &str, limit: usize) -> Result<Vec<DataRecord>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        records::records_for_user(uid, limit, &mut conn).await
    }
}
