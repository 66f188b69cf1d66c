//! Shared state for API handlers and constants

use std::{sync::Arc, time::Duration as StdDuration};

use cache::ResultCache;
use catalog::QueryCatalog;
use warehouse::WarehouseReader;

/// Default maximum number of requests allowed during the rate limiting period.
pub const DEFAULT_MAX_REQUESTS: u64 = u64::MAX;
/// Default duration for the rate limiting window.
pub const DEFAULT_RATE_PERIOD: StdDuration = StdDuration::from_secs(1);

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    reader: WarehouseReader,
    catalog: QueryCatalog,
    cache: Arc<ResultCache>,
    cache_ttl: StdDuration,
    max_requests: u64,
    rate_period: StdDuration,
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState")
            .field("db", &self.catalog.db_name())
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}

impl ApiState {
    /// Create a new [`ApiState`] with an empty result cache.
    ///
    /// Query templates read from the database the reader was configured with.
    pub fn new(
        reader: WarehouseReader,
        cache_ttl: StdDuration,
        max_requests: u64,
        rate_period: StdDuration,
    ) -> Self {
        let catalog = QueryCatalog::new(reader.db_name());
        Self {
            reader,
            catalog,
            cache: Arc::new(ResultCache::new()),
            cache_ttl,
            max_requests,
            rate_period,
        }
    }

    /// Warehouse client used on cache misses.
    pub const fn reader(&self) -> &WarehouseReader {
        &self.reader
    }

    /// Query templates.
    pub const fn catalog(&self) -> &QueryCatalog {
        &self.catalog
    }

    /// Process-wide result cache shared by every handler.
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// How long a cached result is served before it is recomputed.
    pub const fn cache_ttl(&self) -> StdDuration {
        self.cache_ttl
    }

    /// Maximum number of requests allowed per [`rate_period`](Self::rate_period).
    pub const fn max_requests(&self) -> u64 {
        self.max_requests
    }

    /// Time window for rate limiting.
    pub const fn rate_period(&self) -> StdDuration {
        self.rate_period
    }
}
