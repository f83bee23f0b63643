use thiserror::Error;

/// Errors surfaced by cache operations.
///
/// A store failure is never reported as a miss: `Ok(None)` / `Ok(false)`
/// strictly mean "no live entry for this key".
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("store execution failed: {0}")]
    Store(#[from] sqlx::Error),

    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The stored blob for `id` is not a well-formed serialization.
    ///
    /// The caller wrote this data, so a decode failure means the entry is
    /// corrupt; it must not be coerced into a miss.
    #[error("corrupt cache entry for key {id}: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid cache table name: {0:?} (letters, digits and underscores only)")]
    InvalidTable(String),
}
