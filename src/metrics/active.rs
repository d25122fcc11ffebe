//! Active Cache Metrics
//!
//! Metrics specific to selection-driven caches: besides the core counters,
//! they break selection requests down by how the key was resolved.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use crate::nearest::MatchKind;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Metrics for [`ActiveCache`](crate::ActiveCache).
#[derive(Debug, Clone)]
pub struct ActiveCacheMetrics {
    /// Core metrics common to bounded caches.
    pub core: CoreCacheMetrics,

    /// Selections whose key was present in the full item set.
    pub exact_matches: u64,

    /// Selections resolved to the nearest smaller key.
    pub predecessor_fallbacks: u64,

    /// Selections resolved to the nearest larger key.
    pub successor_fallbacks: u64,

    /// Selections that resolved to nothing (empty item set).
    pub unresolved: u64,

    /// Selections that re-aged an entry that was already materialized.
    pub refreshes: u64,

    /// Entries dropped by the initial truncation to the limit.
    pub truncated: u64,
}

impl ActiveCacheMetrics {
    /// Creates a new ActiveCacheMetrics instance
    ///
    /// # Arguments
    /// * `max_entries` - The configured limit of the materialized subset, 0 when unbounded
    pub fn new(max_entries: u64) -> Self {
        Self {
            core: CoreCacheMetrics::new(max_entries),
            exact_matches: 0,
            predecessor_fallbacks: 0,
            successor_fallbacks: 0,
            unresolved: 0,
            refreshes: 0,
            truncated: 0,
        }
    }

    /// Records how a selection key was resolved
    ///
    /// # Arguments
    /// * `kind` - The match kind, or `None` when the full item set was empty
    pub fn record_resolution(&mut self, kind: Option<MatchKind>) {
        match kind {
            Some(MatchKind::Exact) => self.exact_matches += 1,
            Some(MatchKind::Predecessor) => self.predecessor_fallbacks += 1,
            Some(MatchKind::Successor) => self.successor_fallbacks += 1,
            None => self.unresolved += 1,
        }
    }

    /// Records a selection that landed on a materialized key
    ///
    /// This counts the refresh and records a core cache hit.
    pub fn record_refresh(&mut self) {
        self.refreshes += 1;
        self.core.record_hit();
    }

    /// Selections that needed the nearest-key fallback.
    pub fn fallbacks(&self) -> u64 {
        self.predecessor_fallbacks + self.successor_fallbacks
    }

    /// Converts the metrics to an ordered map for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("exact_matches".to_string(), self.exact_matches as f64);
        metrics.insert(
            "predecessor_fallbacks".to_string(),
            self.predecessor_fallbacks as f64,
        );
        metrics.insert(
            "successor_fallbacks".to_string(),
            self.successor_fallbacks as f64,
        );
        metrics.insert("unresolved".to_string(), self.unresolved as f64);
        metrics.insert("refreshes".to_string(), self.refreshes as f64);
        metrics.insert("truncated".to_string(), self.truncated as f64);

        if self.core.requests > 0 {
            metrics.insert(
                "exact_rate".to_string(),
                self.exact_matches as f64 / self.core.requests as f64,
            );
        }

        metrics
    }
}

impl CacheMetrics for ActiveCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "AGE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_breakdown() {
        let mut metrics = ActiveCacheMetrics::new(2);
        metrics.record_resolution(Some(MatchKind::Exact));
        metrics.record_resolution(Some(MatchKind::Predecessor));
        metrics.record_resolution(Some(MatchKind::Successor));
        metrics.record_resolution(None);

        assert_eq!(metrics.exact_matches, 1);
        assert_eq!(metrics.fallbacks(), 2);
        assert_eq!(metrics.unresolved, 1);

        let map = metrics.metrics();
        assert_eq!(map.get("predecessor_fallbacks"), Some(&1.0));
        assert_eq!(map.get("unresolved"), Some(&1.0));
        assert!(!map.contains_key("exact_rate"));
        assert_eq!(metrics.algorithm_name(), "AGE");
    }

    #[test]
    fn test_refresh_counts_as_hit() {
        let mut metrics = ActiveCacheMetrics::new(0);
        metrics.record_refresh();
        assert_eq!(metrics.core.cache_hits, 1);
        assert_eq!(metrics.core.requests, 1);
        assert_eq!(metrics.to_btreemap().get("refreshes"), Some(&1.0));
    }
}
