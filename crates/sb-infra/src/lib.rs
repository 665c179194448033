//! # sb-infra
//!
//! Infrastructure adapters for Shareboard: the Diesel/SQLite entry store and
//! the in-memory history cache layered on top of it.

pub mod clipboard;
pub mod db;

pub use clipboard::{CachedEntryStore, DieselEntryStore};
pub use db::pool::{init_db_pool, DbPool};
