//! SQLite implementation of the `CacheStore` port.
//!
//! One row per key: `id` (primary key), `d` (JSON value), `e` (nullable
//! absolute unix-time expiration). Every operation is a single statement;
//! expired rows are removed lazily when a read discovers them.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use crate::domain::error::CacheError;
use crate::domain::models::CacheStats;
use crate::domain::ports::CacheStore;

/// The column holding the serialized value.
const DATA_FIELD: &str = "d";

/// The column holding the absolute unix-time expiration; NULL never expires.
const EXPIRATION_FIELD: &str = "e";

/// SQLite-backed cache store.
///
/// Holds only the pool handle and the table name, both fixed at
/// construction. Concurrent callers are serialized by the store itself;
/// the provider keeps no state between calls.
#[derive(Clone)]
pub struct SqlCacheStore {
    pool: SqlitePool,
    table: String,
}

impl SqlCacheStore {
    /// Create a store over `pool` targeting `table`.
    ///
    /// Table names cannot be bound as statement parameters, so the name is
    /// validated here once against a strict identifier charset and embedded
    /// verbatim in every statement afterwards. All key and value operands
    /// are bound parameters.
    pub fn new(pool: SqlitePool, table: impl Into<String>) -> Result<Self, CacheError> {
        let table = table.into();
        if !is_valid_identifier(&table) {
            return Err(CacheError::InvalidTable(table));
        }
        Ok(Self { pool, table })
    }

    /// Create the backing table if it does not exist yet.
    ///
    /// The table name is a runtime construction parameter, so the schema is
    /// bootstrapped in code rather than through migration files.
    pub async fn ensure_table(&self) -> Result<(), CacheError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                {DATA_FIELD} TEXT NOT NULL,
                {EXPIRATION_FIELD} INTEGER
            )",
            table = self.table,
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    /// Look up an entry and deserialize it into a concrete type.
    ///
    /// Convenience over [`CacheStore::fetch`] for callers that know what
    /// they stored.
    pub async fn fetch_as<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>, CacheError> {
        match self.fetch(id).await? {
            Some(value) => {
                let typed = serde_json::from_value(value).map_err(|source| CacheError::Corrupt {
                    id: id.to_string(),
                    source,
                })?;
                Ok(Some(typed))
            }
            None => Ok(None),
        }
    }

    /// Serialize any serde value and save it under `id`.
    pub async fn save_value<T: Serialize>(
        &self,
        id: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> Result<(), CacheError> {
        let value = serde_json::to_value(value)?;
        self.save(id, &value, ttl_seconds).await
    }

    /// Remove the row for `id`, reporting failures to the caller.
    async fn delete_row(&self, id: &str) -> Result<(), CacheError> {
        let sql = format!("DELETE FROM {table} WHERE id = ?", table = self.table);
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }

    /// Best-effort removal of an expired row discovered during a read.
    ///
    /// Two readers racing on the same expired key may both land here; a
    /// delete affecting zero rows is a success. If the delete itself fails
    /// the read still reports a miss and the stale row stays behind for a
    /// future access.
    async fn evict_expired(&self, id: &str) {
        if let Err(error) = self.delete_row(id).await {
            warn!(key = id, %error, "failed to remove expired cache entry");
        }
    }

    fn decode(&self, id: &str, raw: &str) -> Result<Value, CacheError> {
        serde_json::from_str(raw).map_err(|source| CacheError::Corrupt {
            id: id.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CacheStore for SqlCacheStore {
    async fn fetch(&self, id: &str) -> Result<Option<Value>, CacheError> {
        let sql = format!(
            "SELECT {DATA_FIELD}, {EXPIRATION_FIELD} FROM {table} WHERE id = ?",
            table = self.table,
        );
        let Some(row) = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await? else {
            debug!(key = id, "cache miss");
            return Ok(None);
        };

        let expiration: Option<i64> = row.try_get(EXPIRATION_FIELD)?;
        if is_expired(expiration, unix_now()) {
            debug!(key = id, "cache miss (expired)");
            self.evict_expired(id).await;
            return Ok(None);
        }

        let raw: String = row.try_get(DATA_FIELD)?;
        let value = self.decode(id, &raw)?;
        debug!(key = id, "cache hit");
        Ok(Some(value))
    }

    async fn fetch_multiple(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Option<Value>>, CacheError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        // One bound placeholder per key; keys never reach the SQL text.
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, {DATA_FIELD}, {EXPIRATION_FIELD} FROM {table} WHERE id IN ({placeholders})",
            table = self.table,
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let now = unix_now();
        let mut results = HashMap::new();
        let mut expired = Vec::new();

        // Rows are consumed forward-only from the executor rather than
        // materialized as a full result set first.
        {
            let mut rows = query.fetch(&self.pool);
            while let Some(row) = rows.try_next().await? {
                let key: String = row.try_get("id")?;
                let expiration: Option<i64> = row.try_get(EXPIRATION_FIELD)?;

                if is_expired(expiration, now) {
                    expired.push(key.clone());
                    results.insert(key, None);
                    continue;
                }

                let raw: String = row.try_get(DATA_FIELD)?;
                let value = self.decode(&key, &raw)?;
                results.insert(key, Some(value));
            }
        }

        for key in &expired {
            self.evict_expired(key).await;
        }

        Ok(results)
    }

    async fn contains(&self, id: &str) -> Result<bool, CacheError> {
        let sql = format!(
            "SELECT {EXPIRATION_FIELD} FROM {table} WHERE id = ?",
            table = self.table,
        );
        let Some(row) = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await? else {
            return Ok(false);
        };

        let expiration: Option<i64> = row.try_get(EXPIRATION_FIELD)?;
        if is_expired(expiration, unix_now()) {
            self.evict_expired(id).await;
            return Ok(false);
        }

        Ok(true)
    }

    async fn save(&self, id: &str, value: &Value, ttl_seconds: u64) -> Result<(), CacheError> {
        let expiration = if ttl_seconds > 0 {
            let ttl = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
            Some(unix_now().saturating_add(ttl))
        } else {
            None
        };
        let payload = serde_json::to_string(value)?;

        let sql = format!(
            "INSERT INTO {table} (id, {DATA_FIELD}, {EXPIRATION_FIELD}) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                {DATA_FIELD} = excluded.{DATA_FIELD},
                {EXPIRATION_FIELD} = excluded.{EXPIRATION_FIELD}",
            table = self.table,
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(&payload)
            .bind(expiration)
            .execute(&self.pool)
            .await?;

        debug!(key = id, ttl = ttl_seconds, "cache save");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), CacheError> {
        self.delete_row(id).await
    }

    async fn flush(&self) -> Result<(), CacheError> {
        // Un-WHERE'd DELETE is the store's bulk-clear construct; SQLite runs
        // it with the truncate optimization instead of row-by-row deletes.
        let sql = format!("DELETE FROM {table}", table = self.table);
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats::unavailable()
    }
}

fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// An entry is expired once its expiration is set and strictly in the past.
fn is_expired(expiration: Option<i64>, now: i64) -> bool {
    matches!(expiration, Some(at) if at < now)
}

/// Table names are embedded in statement text, so only plain identifiers
/// are accepted: leading letter or underscore, then letters, digits,
/// underscores.
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    // A pooled :memory: database is per-connection; cap the pool at one
    // connection so every statement sees the same database.
    async fn setup_store() -> SqlCacheStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to create test pool");

        let store = SqlCacheStore::new(pool, "cache").expect("valid table name");
        store.ensure_table().await.expect("failed to create table");
        store
    }

    async fn row_count(store: &SqlCacheStore) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM cache")
            .fetch_one(&store.pool)
            .await
            .expect("failed to count rows")
    }

    /// Backdate an entry so it is already expired without sleeping.
    async fn save_expired(store: &SqlCacheStore, id: &str, value: &Value) {
        let payload = serde_json::to_string(value).expect("failed to serialize");
        sqlx::query("INSERT INTO cache (id, d, e) VALUES (?, ?, ?)")
            .bind(id)
            .bind(payload)
            .bind(unix_now() - 60)
            .execute(&store.pool)
            .await
            .expect("failed to insert expired row");
    }

    #[tokio::test]
    async fn test_save_then_fetch_round_trip() {
        let store = setup_store().await;

        let value = json!({"name": "jerry", "tags": ["a", "b"], "active": true});
        store.save("testkey", &value, 0).await.expect("save failed");

        let fetched = store.fetch("testkey").await.expect("fetch failed");
        assert_eq!(fetched, Some(value));
    }

    #[tokio::test]
    async fn test_fetch_unknown_key_is_miss() {
        let store = setup_store().await;

        let fetched = store.fetch("nothing").await.expect("fetch failed");
        assert!(fetched.is_none());
        assert_eq!(row_count(&store).await, 0);
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_entry() {
        let store = setup_store().await;

        store.save("k", &json!("v1"), 0).await.expect("save failed");
        store.save("k", &json!("v2"), 100).await.expect("save failed");

        let fetched = store.fetch("k").await.expect("fetch failed");
        assert_eq!(fetched, Some(json!("v2")));
        assert_eq!(row_count(&store).await, 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_miss_and_row_removed() {
        let store = setup_store().await;
        save_expired(&store, "stale", &json!(42)).await;

        let fetched = store.fetch("stale").await.expect("fetch failed");
        assert!(fetched.is_none());
        assert_eq!(row_count(&store).await, 0);
    }

    #[tokio::test]
    async fn test_contains_live_and_expired() {
        let store = setup_store().await;

        store.save("live", &json!(1), 1000).await.expect("save failed");
        save_expired(&store, "stale", &json!(2)).await;

        assert!(store.contains("live").await.expect("contains failed"));
        assert!(!store.contains("stale").await.expect("contains failed"));
        assert!(!store.contains("absent").await.expect("contains failed"));

        // The expired row was removed by the contains check.
        assert_eq!(row_count(&store).await, 1);
    }

    #[tokio::test]
    async fn test_fetch_multiple_live_expired_and_absent() {
        let store = setup_store().await;

        store.save("a", &json!("live"), 0).await.expect("save failed");
        save_expired(&store, "b", &json!("stale")).await;

        let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let results = store.fetch_multiple(&keys).await.expect("fetch failed");

        assert_eq!(results.get("a"), Some(&Some(json!("live"))));
        assert_eq!(results.get("b"), Some(&None));
        assert!(!results.contains_key("c"));

        // The expired row was removed as a side effect.
        assert_eq!(row_count(&store).await, 1);
    }

    #[tokio::test]
    async fn test_fetch_multiple_empty_key_set() {
        let store = setup_store().await;

        let results = store.fetch_multiple(&[]).await.expect("fetch failed");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = setup_store().await;

        store.save("k", &json!(1), 0).await.expect("save failed");
        store.delete("k").await.expect("delete failed");
        store.delete("k").await.expect("delete of absent key failed");

        assert!(store.fetch("k").await.expect("fetch failed").is_none());
    }

    #[tokio::test]
    async fn test_flush_empties_the_table() {
        let store = setup_store().await;

        for i in 0..5 {
            store
                .save(&format!("key{i}"), &json!(i), 0)
                .await
                .expect("save failed");
        }
        assert_eq!(row_count(&store).await, 5);

        store.flush().await.expect("flush failed");
        assert_eq!(row_count(&store).await, 0);
    }

    #[tokio::test]
    async fn test_keys_with_sql_metacharacters() {
        let store = setup_store().await;

        let key = "weird'); DROP TABLE cache; --\"key";
        let value = json!({"quote": "it's \"quoted\" \\ backslashed"});
        store.save(key, &value, 0).await.expect("save failed");

        assert_eq!(
            store.fetch(key).await.expect("fetch failed"),
            Some(value.clone())
        );

        let results = store
            .fetch_multiple(&[key.to_string()])
            .await
            .expect("fetch_multiple failed");
        assert_eq!(results.get(key), Some(&Some(value)));
    }

    #[tokio::test]
    async fn test_corrupt_entry_surfaces_as_error() {
        let store = setup_store().await;

        sqlx::query("INSERT INTO cache (id, d, e) VALUES (?, ?, NULL)")
            .bind("broken")
            .bind("not json {{{")
            .execute(&store.pool)
            .await
            .expect("failed to insert corrupt row");

        let result = store.fetch("broken").await;
        assert!(matches!(result, Err(CacheError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_a_miss() {
        let store = setup_store().await;

        sqlx::query("DROP TABLE cache")
            .execute(&store.pool)
            .await
            .expect("failed to drop table");

        let result = store.fetch("anything").await;
        assert!(matches!(result, Err(CacheError::Store(_))));
    }

    #[tokio::test]
    async fn test_typed_round_trip() {
        let store = setup_store().await;

        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Profile {
            name: String,
            visits: u32,
        }

        let profile = Profile {
            name: "somebody".to_string(),
            visits: 3,
        };
        store
            .save_value("profile", &profile, 0)
            .await
            .expect("save failed");

        let fetched: Option<Profile> = store.fetch_as("profile").await.expect("fetch failed");
        assert_eq!(fetched, Some(profile));
    }

    #[tokio::test]
    async fn test_stats_reports_unavailable() {
        let store = setup_store().await;

        let stats = store.stats().await;
        assert_eq!(stats, CacheStats::unavailable());
    }

    #[test]
    fn test_table_name_validation() {
        assert!(is_valid_identifier("cache"));
        assert!(is_valid_identifier("_cache_2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("2cache"));
        assert!(!is_valid_identifier("cache; DROP TABLE x"));
        assert!(!is_valid_identifier("cache-table"));
    }

    #[test]
    fn test_expiry_predicate() {
        assert!(!is_expired(None, 100));
        assert!(!is_expired(Some(100), 100));
        assert!(!is_expired(Some(101), 100));
        assert!(is_expired(Some(99), 100));
    }
}
