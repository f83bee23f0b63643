//! Port trait definitions
//!
//! The cache contract is a trait rather than a base class: infrastructure
//! adapters implement `CacheStore`, and callers depend only on the trait.

pub mod cache_store;

pub use cache_store::CacheStore;
