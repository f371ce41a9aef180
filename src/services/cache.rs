use crate::core::AddressResolver;
use crate::models::Coordinates;
use crate::services::geocoder::{normalize_address, Geocode};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Memoizing resolver
///
/// Sits in front of a rate-limited geocoder. Answers are cached, including
/// "not found", so an address the service cannot place only costs one call
/// per TTL. Service failures are never cached. Concurrent lookups of the same
/// uncached address share a single call.
pub struct CachedResolver<R> {
    inner: R,
    cache: moka::sync::Cache<String, Option<Coordinates>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<R: Geocode> CachedResolver<R> {
    /// Create a new cache with at most `max_entries` addresses
    pub fn new(inner: R, max_entries: u64, ttl_secs: u64) -> Self {
        let cache = moka::sync::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            inner,
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Drop every cached address
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();

        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            entries: self.cache.entry_count(),
            hit_count: hits,
            miss_count: misses,
            hit_rate: if lookups > 0 { hits as f64 / lookups as f64 } else { 0.0 },
        }
    }
}

impl<R: Geocode> AddressResolver for CachedResolver<R> {
    fn resolve(&self, address: &str) -> Option<Coordinates> {
        let key = normalize_address(address);

        if let Some(cached) = self.cache.get(&key) {
            tracing::trace!("Geocode cache hit: {}", key);
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached;
        }

        tracing::trace!("Geocode cache miss: {}", key);
        self.misses.fetch_add(1, Ordering::Relaxed);

        match self.cache.try_get_with(key, || self.inner.geocode(address)) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!("Geocoding error for '{}': {}", address, e);
                None
            }
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geocoder::GeocodeError;
    use std::sync::atomic::AtomicUsize;

    struct CountingResolver {
        calls: AtomicUsize,
        /// Number of leading calls that fail
        failures: usize,
        delay: Duration,
    }

    impl Geocode for CountingResolver {
        fn geocode(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);

            if call < self.failures {
                return Err(GeocodeError::ApiError("Geocoding failed: 503".to_string()));
            }
            if address.contains("Locust") {
                Ok(Some(Coordinates::new(41.5868, -93.625)))
            } else {
                Ok(None)
            }
        }
    }

    fn counting() -> CountingResolver {
        CountingResolver {
            calls: AtomicUsize::new(0),
            failures: 0,
            delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_repeat_lookups_hit_cache() {
        let resolver = CachedResolver::new(counting(), 100, 60);

        let first = resolver.resolve("400 Locust St");
        let second = resolver.resolve("  400 locust st");

        assert_eq!(first, second);
        assert!(first.is_some());
        assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_misses_are_cached() {
        let resolver = CachedResolver::new(counting(), 100, 60);

        assert!(resolver.resolve("1 Nowhere Rd").is_none());
        assert!(resolver.resolve("1 Nowhere Rd").is_none());

        assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failures_are_retried() {
        let resolver = CachedResolver::new(
            CountingResolver {
                failures: 1,
                ..counting()
            },
            100,
            86_400,
        );

        assert!(resolver.resolve("400 Locust St").is_none());
        assert_eq!(
            resolver.resolve("400 Locust St"),
            Some(Coordinates::new(41.5868, -93.625))
        );
        // The recovered answer is cached
        assert!(resolver.resolve("400 Locust St").is_some());
        assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_misses_share_one_call() {
        let resolver = CachedResolver::new(
            CountingResolver {
                delay: Duration::from_millis(100),
                ..counting()
            },
            100,
            60,
        );

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert!(resolver.resolve("400 Locust St").is_some());
                });
            }
        });

        assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stats() {
        let resolver = CachedResolver::new(counting(), 100, 60);
        resolver.resolve("400 Locust St");
        resolver.resolve("400 Locust St");
        resolver.resolve("1 Nowhere Rd");

        let stats = resolver.stats();
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 2);
        assert_eq!(stats.entries, 2);
        assert!((stats.hit_rate - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_clear() {
        let resolver = CachedResolver::new(counting(), 100, 60);
        resolver.resolve("400 Locust St");
        resolver.clear();
        resolver.resolve("400 Locust St");

        assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 2);
    }
}
