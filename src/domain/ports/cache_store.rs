use async_trait::async_trait;
use std::time::Duration;

/// Error type for cache operations.
///
/// A miss is not an error: `get` returns `Ok(None)`. These variants
/// exist so callers can tell an unavailable backend apart from an
/// absent key and degrade accordingly.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Cache operation failed: {0}")]
    Backend(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value cache holding serialized snapshots with per-key TTL.
///
/// The cache is a best-effort accelerator, never the source of truth:
/// every value stored here is re-derivable from the record store, and
/// callers must treat any failure as a miss (reads) or a no-op
/// (invalidation).
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Return the value for `key` if present and unexpired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key`, expiring after `ttl`. Overwrites
    /// unconditionally; concurrent writers of the same key are
    /// last-write-wins.
    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;

    /// Remove a single key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Remove every key sharing `prefix`. Used to invalidate all cached
    /// list pages for a tenant in one call; must be a genuine prefix
    /// scan, not a literal key match.
    async fn delete_prefix(&self, prefix: &str) -> CacheResult<()>;
}
