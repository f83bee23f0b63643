//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files. Tests use file-backed databases so every pooled connection
//! sees the same state (a pooled `:memory:` database is per-connection).

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use sqlstash::infrastructure::database::{DatabaseConnection, SqlCacheStore};

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Create a temporary test database path
///
/// Returns the owning `TempDir` alongside the path; keep the dir alive for
/// the duration of the test.
pub fn temp_db_path() -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let db_path = dir.path().join("test.db");
    (dir, db_path)
}

/// Open a connection pool and a cache store over a fresh table
pub async fn setup_store(db_path: &Path) -> (DatabaseConnection, SqlCacheStore) {
    let url = format!("sqlite:{}", db_path.display());
    let db = DatabaseConnection::new(&url, 5)
        .await
        .expect("failed to create database connection");

    let store = SqlCacheStore::new(db.pool().clone(), "cache").expect("valid table name");
    store.ensure_table().await.expect("failed to create table");

    (db, store)
}

/// Count physical rows in the backing table
pub async fn row_count(db: &DatabaseConnection) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM cache")
        .fetch_one(db.pool())
        .await
        .expect("failed to count rows")
}
