//! Database infrastructure
//!
//! Connection pool management and the SQLite implementation of `CacheStore`.

pub mod connection;
pub mod sql_cache;

pub use connection::DatabaseConnection;
pub use sql_cache::SqlCacheStore;
