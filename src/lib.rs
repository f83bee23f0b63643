//! Sqlstash - Relational Cache Provider
//!
//! A keyed, expiring, persistent cache whose durable state lives entirely in
//! a single relational table, with an upsert-based write path and lazy expiry
//! enforced on read. There is no in-memory tier, no background sweeper, and
//! no cross-call state beyond the store connection and the table name.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): the `CacheStore` contract, data model, and
//!   error taxonomy
//! - **Infrastructure Layer** (`infrastructure`): configuration, logging,
//!   and the SQLite-backed store implementation
//! - **CLI Layer** (`cli`): command-line driver
//!
//! # Example
//!
//! ```ignore
//! use sqlstash::{CacheStore, DatabaseConnection, SqlCacheStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = DatabaseConnection::new("sqlite:sqlstash.db", 10).await?;
//!     let store = SqlCacheStore::new(db.pool().clone(), "cache")?;
//!     store.ensure_table().await?;
//!
//!     store.save("greeting", &serde_json::json!("hello"), 300).await?;
//!     let value = store.fetch("greeting").await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::error::CacheError;
pub use domain::models::{CacheConfig, CacheStats, Config, DatabaseConfig, LoggingConfig};
pub use domain::ports::CacheStore;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::database::{DatabaseConnection, SqlCacheStore};
