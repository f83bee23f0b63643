use serde::{Deserialize, Serialize};

/// Backend statistics descriptor.
///
/// A relational backing table exposes none of these metrics cheaply, so every
/// field is `None` rather than a fabricated value. Callers that need counters
/// must keep their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cache hits since startup
    pub hits: Option<u64>,
    /// Number of cache misses since startup
    pub misses: Option<u64>,
    /// Backend uptime in seconds
    pub uptime: Option<u64>,
    /// Memory used by the cache, in bytes
    pub memory_usage: Option<u64>,
    /// Memory still available to the cache, in bytes
    pub memory_available: Option<u64>,
}

impl CacheStats {
    /// The fixed "capabilities not available" descriptor.
    pub const fn unavailable() -> Self {
        Self {
            hits: None,
            misses: None,
            uptime: None,
            memory_usage: None,
            memory_available: None,
        }
    }
}
