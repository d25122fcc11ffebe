#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## How the Pieces Fit
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                           ActiveCache<K, V>                          │
//! │                                                                      │
//! │   insert / remove / retain        select(key)                        │
//! │            │                          │                              │
//! │            ▼                          ▼  age = clock.tick()          │
//! │   ┌──────────────────┐   find_nearest (exact → pred → succ)          │
//! │   │  Full item set   │──────────────┐                                │
//! │   │ OrderedMap<K, V> │              │                                │
//! │   └──────────────────┘              ▼                                │
//! │            │ update       bounded_insert(limit, age, k, v)           │
//! │            ▼                          │  evicts min (age, key)       │
//! │   ┌───────────────────────────────────▼──────┐                       │
//! │   │ Materialized subset  ActiveMap<K, V>      │── active() / render  │
//! │   │ K → (Age, V), at most `limit` entries     │                      │
//! │   └───────────────────────────────────────────┘                      │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Selection-Driven Eviction
//!
//! ```rust
//! use active_cache::ActiveCache;
//! use core::num::NonZeroUsize;
//!
//! let mut cache = ActiveCache::new(NonZeroUsize::new(2));
//! cache.insert_batch([(1, "a"), (2, "b"), (3, "c")]);
//!
//! cache.select(&1);
//! cache.select(&2);
//! cache.select(&3);   // 1 was selected longest ago and is evicted
//!
//! let live: Vec<_> = cache.active().map(|(k, _)| *k).collect();
//! assert_eq!(live, vec![2, 3]);
//! ```
//!
//! ## Nearest-Key Fallback
//!
//! ```rust
//! use active_cache::ActiveCache;
//! use active_cache::nearest::MatchKind;
//!
//! let mut cache = ActiveCache::new(None);
//! cache.insert_batch([(1, "a"), (9, "b")]);
//!
//! let hit = cache.select(&5).unwrap();
//! assert_eq!((hit.key, hit.kind), (1, MatchKind::Predecessor));
//!
//! let hit = cache.select(&0).unwrap();
//! assert_eq!((hit.key, hit.kind), (1, MatchKind::Successor));
//! ```
//!
//! ## Initial Population
//!
//! ```rust
//! use active_cache::config::ActiveCacheConfig;
//! use active_cache::ActiveCache;
//! use core::num::NonZeroUsize;
//!
//! let config = ActiveCacheConfig::bounded(NonZeroUsize::new(2).unwrap());
//! let cache = ActiveCache::init(config, [(30, "c"), (10, "a"), (20, "b")]);
//!
//! // The smallest keys are materialized first
//! assert_eq!(cache.to_active_map().into_keys().collect::<Vec<_>>(), vec![10, 20]);
//! ```
//!
//! ## Modules
//!
//! - [`age`]: Logical clock used to tag materialized entries
//! - [`ordered`]: Key-ordered map with predecessor/successor queries
//! - [`nearest`]: Exact-then-predecessor-then-successor key resolution
//! - [`bounded`]: Materialized subset, truncation and bounded insertion
//! - [`cache`]: The selection-driven [`ActiveCache`]
//! - [`current`]: Single-result wrapper over an [`ActiveCache`]
//! - [`event`]: Event enum for driving a cache from one stream
//! - [`config`]: Cache configuration
//! - [`error`]: Configuration errors
//! - [`metrics`]: Metrics collection

#![no_std]

extern crate alloc;

#[cfg(test)]
#[macro_use]
extern crate std;

/// Logical age clock.
///
/// Provides the `Age` tag and the monotonic `AgeCounter` that issues it.
pub mod age;

/// Key-ordered associative container.
pub mod ordered;

/// Nearest-key resolution over an ordered map.
pub mod nearest;

/// Materialized entry type.
pub mod entry;

/// Bounded materialized subset and its eviction policy.
///
/// Provides `truncate_to_limit` for initial population and `bounded_insert`
/// for age-aware insertion with eviction.
pub mod bounded;

/// Selection-driven active cache.
pub mod cache;

/// Single-result convenience wrapper.
pub mod current;

/// Inbound event stream support.
pub mod event;

/// Cache configuration structures.
pub mod config;

/// Configuration errors.
pub mod error;

/// Cache metrics system.
///
/// Provides `BTreeMap`-based metrics reporting with deterministic key order.
pub mod metrics;

pub use age::{Age, AgeCounter};
pub use bounded::{bounded_insert, truncate_to_limit, ActiveMap};
pub use cache::{ActiveCache, Selected};
pub use config::ActiveCacheConfig;
pub use current::{CurrentResult, ResultSource, Served};
pub use entry::ActiveEntry;
pub use error::ConfigError;
pub use event::{Applied, Event};
pub use nearest::{find_nearest, MatchKind, Nearest};
pub use ordered::OrderedMap;
