//! In-process cache store backed by a moka TTL cache.
//!
//! Each entry carries its own TTL (list pages, single-entity lookups,
//! and stats snapshots expire on different schedules), so expiration
//! uses a per-entry `Expiry` policy instead of a cache-wide
//! `time_to_live`.

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};

use crate::domain::ports::{CacheError, CacheResult, CacheStore};

#[derive(Debug, Clone)]
struct Entry {
    payload: String,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Memory-backed `CacheStore`.
///
/// Prefix invalidation registers a closure predicate with moka;
/// eviction is lazy, but reads re-check registered predicates, so an
/// invalidated entry is never returned.
pub struct MemoryCacheStore {
    entries: Cache<String, Entry>,
}

impl MemoryCacheStore {
    pub fn new(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .support_invalidation_closures()
            .expire_after(PerEntryTtl)
            .build();

        Self { entries }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.get(key).await.map(|entry| entry.payload))
    }

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        self.entries
            .insert(
                key.to_string(),
                Entry {
                    payload: value,
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> CacheResult<()> {
        let prefix = prefix.to_string();
        self.entries
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(())
    }
}
