//! Gateway Engine
//!
//! The gateway engine holds the persistence model for the scoped data gateway. It is provider-agnostic:
//! the HTTP server never talks to a database directly, but goes through the APIs in this crate, which in
//! turn are generic over the storage traits in [`mod@traits`].
//!
//! The crate is divided into three main sections:
//! 1. The storage traits ([`mod@traits`]). These define the narrow contract a document store backend must
//!    implement: keyed reads, conditional writes (create-if-absent), appends, and bounded owner-scoped
//!    queries. SQLite is the bundled reference backend; anything that can satisfy the traits can be swapped
//!    in without touching the server.
//! 2. The record types ([`mod@db_types`]). These are the documents the gateway persists, and double as the
//!    wire format for responses.
//! 3. The store APIs ([`ProfileApi`] and [`DataApi`]). These implement the gateway's storage semantics
//!    (lazy profile creation, principal scoping, page limits) on top of any backend.
pub mod db_types;
pub mod traits;

mod store_api;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use store_api::{DataApi, ProfileApi, MAX_PAGE_SIZE};
pub use traits::{DataStore, StoreError, UserStore};
