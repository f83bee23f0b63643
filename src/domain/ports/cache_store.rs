use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::CacheError;
use crate::domain::models::CacheStats;

/// Contract for a keyed, expiring, persistent cache.
///
/// Every operation is a single synchronous round trip to the backing store;
/// implementations hold no in-process cache and no locks. Expiry is lazy: an
/// entry whose expiration has passed is invisible to every reader, but the
/// physical row is only removed the next time it is read or checked, never by
/// a background process.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a single entry by exact key.
    ///
    /// Returns `Ok(None)` when no row exists or the row has expired; an
    /// expired row is deleted as a side effect (best effort). A store
    /// failure is reported as an error, never as a miss.
    ///
    /// # Errors
    /// Returns error if:
    /// - The store statement fails
    /// - The stored blob cannot be deserialized (`CacheError::Corrupt`)
    async fn fetch(&self, id: &str) -> Result<Option<Value>, CacheError>;

    /// Look up several entries in one batched statement.
    ///
    /// An empty key set returns an empty map without querying. The result
    /// contains `Some(value)` for live entries and `None` for entries whose
    /// row was found expired (and deleted as a side effect). Keys that
    /// matched no row are absent from the map; callers treat any absent key
    /// as a miss.
    ///
    /// Every key is a bound statement parameter, so keys containing SQL
    /// metacharacters are safe.
    async fn fetch_multiple(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Option<Value>>, CacheError>;

    /// Check whether a live entry exists for `id`.
    ///
    /// True iff a row exists and is not expired. An expired row is deleted
    /// when discovered, so this read-named operation may write.
    async fn contains(&self, id: &str) -> Result<bool, CacheError>;

    /// Create or replace the entry for `id`.
    ///
    /// `ttl_seconds` of 0 means the entry never expires; otherwise the
    /// expiration is `now + ttl_seconds`. The write is a single atomic
    /// upsert replacing value and expiration together, and is idempotent
    /// under retry.
    async fn save(&self, id: &str, value: &Value, ttl_seconds: u64) -> Result<(), CacheError>;

    /// Remove the entry for `id`.
    ///
    /// Deleting a key with no entry succeeds; a statement affecting zero
    /// rows is not an error.
    async fn delete(&self, id: &str) -> Result<(), CacheError>;

    /// Unconditionally remove every entry in the cache.
    async fn flush(&self) -> Result<(), CacheError>;

    /// Backend statistics. This backend reports every field as unavailable.
    async fn stats(&self) -> CacheStats;
}
