//! # Storage backend contracts.
//!
//! This module defines the interface contracts of the gateway's document store *backends*.
//!
//! ## Collections
//! The gateway persists two collections: per-principal profile documents ([`crate::db_types::UserRecord`],
//! keyed by principal id) and append-only payload documents ([`crate::db_types::DataRecord`], queried by
//! owner). The primitives are deliberately narrow: keyed get, conditional put (create-if-absent), append,
//! and an equality/order/limit query. No caching and no cross-document transactions are part of the
//! contract.
//!
//! ## Traits
//! * [`UserStore`] defines keyed access to profile documents. The create-if-absent primitive is what makes
//!   lazy profile creation deterministic under concurrent first requests: whichever write lands first wins,
//!   and both callers observe the winning record.
//! * [`DataStore`] defines append and owner-scoped query access to payload documents.
mod data_store;
mod user_store;

use thiserror::Error;

pub use data_store::DataStore;
pub use user_store::UserStore;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Could not encode payload: {0}")]
    PayloadEncoding(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::PayloadEncoding(e.to_string())
    }
}
