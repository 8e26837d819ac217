//! SQLite reference backend for the gateway engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
