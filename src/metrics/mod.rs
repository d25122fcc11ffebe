//! Cache Metrics System
//!
//! Metrics are reported through the [`CacheMetrics`] trait as a `BTreeMap`
//! so that the keys always come out in the same order, which keeps test
//! assertions and exported reports reproducible.
//!
//! [`CoreCacheMetrics`] holds the counters every bounded cache shares
//! (requests, hits, insertions, evictions, occupancy). [`ActiveCacheMetrics`]
//! extends them with how selection keys were resolved.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod active;

pub use active::ActiveCacheMetrics;

/// Counters shared by bounded caches.
///
/// A *request* is one selection-change event. It is a *hit* when the key it
/// resolved to was already materialized.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total number of selection requests.
    pub requests: u64,

    /// Requests whose resolved key was already materialized.
    pub cache_hits: u64,

    /// Entries newly materialized (refreshes of present keys excluded).
    pub insertions: u64,

    /// Entries dropped to respect the limit.
    pub evictions: u64,

    /// Current number of materialized entries.
    pub current_entries: u64,

    /// Configured limit, 0 when unbounded.
    pub max_entries: u64,
}

impl CoreCacheMetrics {
    /// Creates a new CoreCacheMetrics instance for the given limit
    ///
    /// # Arguments
    /// * `max_entries` - The configured limit of the materialized subset, 0 when unbounded
    pub fn new(max_entries: u64) -> Self {
        Self {
            max_entries,
            ..Default::default()
        }
    }

    /// Records a request that found its key already materialized
    ///
    /// This increments both total requests and cache hits.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a request whose key was not materialized
    ///
    /// This increments total requests only. Cache misses are calculated
    /// as (requests - cache_hits), and a request that resolved to no item
    /// at all also counts as a miss.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a newly materialized entry
    ///
    /// Called when a selection brings in a key that was not live, or that
    /// was evicted by its own insertion.
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an eviction
    ///
    /// This increments the eviction counter. Occupancy is updated separately
    /// through [`set_current_entries`](Self::set_current_entries).
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Sets the current occupancy of the materialized subset
    ///
    /// # Arguments
    /// * `entries` - Number of entries materialized after the last operation
    pub fn set_current_entries(&mut self, entries: u64) {
        self.current_entries = entries;
    }

    /// Fraction of requests that were hits, 0.0 without requests.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of requests that were misses, 0.0 without requests.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            (self.requests - self.cache_hits) as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Occupancy relative to the limit, 0.0 when unbounded.
    pub fn utilization(&self) -> f64 {
        if self.max_entries > 0 {
            self.current_entries as f64 / self.max_entries as f64
        } else {
            0.0
        }
    }

    /// Converts the core counters to an ordered map for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert(
            "cache_misses".to_string(),
            (self.requests - self.cache_hits) as f64,
        );
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("requests".to_string(), self.requests as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics.insert("current_entries".to_string(), self.current_entries as f64);
        metrics.insert("max_entries".to_string(), self.max_entries as f64);
        metrics.insert("utilization".to_string(), self.utilization());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics reporting.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Short name identifying the eviction policy.
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_rates() {
        let mut core = CoreCacheMetrics::new(4);
        assert_eq!(core.hit_rate(), 0.0);

        core.record_miss();
        core.record_insertion();
        core.record_hit();
        core.record_miss();
        core.record_insertion();
        core.set_current_entries(2);

        assert_eq!(core.requests, 3);
        assert_eq!(core.insertions, 2);
        assert!((core.hit_rate() - 1.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(core.utilization(), 0.5);

        let map = core.to_btreemap();
        assert_eq!(map.get("cache_misses"), Some(&2.0));
        assert_eq!(map.get("current_entries"), Some(&2.0));
        assert!(map.contains_key("eviction_rate"));
    }

    #[test]
    fn test_unbounded_has_no_utilization() {
        let mut core = CoreCacheMetrics::new(0);
        core.record_eviction();
        core.set_current_entries(10);
        assert_eq!(core.evictions, 1);
        assert_eq!(core.utilization(), 0.0);
        assert!(!core.to_btreemap().contains_key("eviction_rate"));
    }
}
