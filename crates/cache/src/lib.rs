//! Process-wide memo of query results with a freshness window.
//!
//! Entries are keyed by [`QueryRequest`] and expire lazily: an entry older
//! than the TTL is dropped the next time it is looked up. There is no
//! background sweeper.

use std::{future::Future, sync::Arc, time::Duration};

use catalog::QueryRequest;
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;
use warehouse::TabularResult;

/// Default freshness window of one hour
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// A cached result and the instant it was produced
#[derive(Debug, Clone)]
pub struct CacheEntry {
    result: Arc<TabularResult>,
    created_at: Instant,
}

impl CacheEntry {
    /// Cached result
    pub fn result(&self) -> &Arc<TabularResult> {
        &self.result
    }

    /// When the result was stored
    pub const fn created_at(&self) -> Instant {
        self.created_at
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() < ttl
    }
}

/// Sharded in-memory cache of tabular results.
///
/// Lookups on different keys never block each other. Two concurrent misses
/// on the same key may both compute; the later insert wins.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: DashMap<QueryRequest, CacheEntry>,
}

impl ResultCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh result for `request`, if any.
    ///
    /// An expired entry is evicted and reported as a miss. A zero `ttl`
    /// never hits.
    pub fn get(&self, request: &QueryRequest, ttl: Duration) -> Option<Arc<TabularResult>> {
        let expired = {
            let entry = self.entries.get(request)?;
            if entry.is_fresh(ttl) {
                return Some(Arc::clone(&entry.result));
            }
            entry.created_at
        };
        // Only drop the entry we judged stale; a concurrent refresh stays.
        self.entries.remove_if(request, |_, entry| entry.created_at == expired);
        None
    }

    /// Return the fresh result for `request`, or run `compute` once and store
    /// its result.
    ///
    /// Errors from `compute` are returned unchanged and nothing is stored, so
    /// the next call retries.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        request: &QueryRequest,
        ttl: Duration,
        compute: F,
    ) -> Result<Arc<TabularResult>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TabularResult, E>>,
    {
        if let Some(result) = self.get(request, ttl) {
            debug!(key = %request, "Result cache hit");
            return Ok(result);
        }
        debug!(key = %request, "Result cache miss");

        let result = Arc::new(compute().await?);
        self.entries.insert(
            *request,
            CacheEntry { result: Arc::clone(&result), created_at: Instant::now() },
        );
        Ok(result)
    }

    /// Drop the entry for `request`
    pub fn invalidate(&self, request: &QueryRequest) {
        self.entries.remove(request);
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drop every entry older than `ttl`
    pub fn purge_expired(&self, ttl: Duration) {
        self.entries.retain(|_, entry| entry.is_fresh(ttl));
    }

    /// Number of stored entries, fresh or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
