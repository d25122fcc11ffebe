//! Selection-Driven Active Cache
//!
//! [`ActiveCache`] owns two views of the same keyed items:
//!
//! - the **full item set**, every known item, unbounded;
//! - the **materialized subset**, the items currently kept live, bounded by
//!   an optional limit and tagged with the age at which each was last
//!   selected.
//!
//! # Event Handling
//!
//! | Event | Full item set | Materialized subset |
//! |-------|---------------|---------------------|
//! | bulk insert ([`insert_batch`]) | union, existing keys win | untouched |
//! | bulk delete ([`remove`], [`retain`]) | keys removed | untouched |
//! | update ([`update`], [`update_all`]) | value changed | value changed |
//! | selection ([`select`]) | read | bounded insert |
//!
//! A selection bumps the age counter, resolves its key against the full item
//! set with [`find_nearest`], and materializes the match with the new age,
//! evicting the oldest entry if the limit is reached. Deleted items may stay
//! materialized until evicted; selections always resolve against the current
//! full item set, never against stale materialized entries.
//!
//! [`insert_batch`]: ActiveCache::insert_batch
//! [`remove`]: ActiveCache::remove
//! [`retain`]: ActiveCache::retain
//! [`update`]: ActiveCache::update
//! [`update_all`]: ActiveCache::update_all
//! [`select`]: ActiveCache::select
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe. Every operation takes `&mut self`
//! and completes synchronously, so each event is applied atomically.

extern crate alloc;

use crate::age::{Age, AgeCounter};
use crate::bounded::{bounded_insert, truncate_to_limit, ActiveMap, Iter};
use crate::config::ActiveCacheConfig;
use crate::error::ConfigError;
use crate::metrics::{ActiveCacheMetrics, CacheMetrics};
use crate::nearest::{find_nearest, MatchKind};
use crate::ordered::OrderedMap;
use alloc::collections::btree_map;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;
use core::num::NonZeroUsize;

/// Outcome of a successful [`ActiveCache::select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected<K, V> {
    /// Key the selection resolved to.
    pub key: K,
    /// How the selection key was resolved.
    pub kind: MatchKind,
    /// Age assigned to the materialized entry.
    pub age: Age,
    /// `true` if the key was already materialized before this selection.
    pub refreshed: bool,
    /// Entry evicted to respect the limit, if any.
    pub evicted: Option<(K, V)>,
}

/// A bounded, key-ordered cache of materialized items driven by selections.
///
/// # Examples
///
/// ```
/// use active_cache::ActiveCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = ActiveCache::new(NonZeroUsize::new(2));
/// cache.insert_batch([(1, "a"), (2, "b"), (3, "c")]);
///
/// cache.select(&1);
/// cache.select(&2);
/// let selected = cache.select(&3).unwrap();
///
/// // Key 1 was selected longest ago
/// assert_eq!(selected.evicted, Some((1, "a")));
/// assert_eq!(cache.active().map(|(k, _)| *k).collect::<Vec<_>>(), vec![2, 3]);
/// ```
pub struct ActiveCache<K, V> {
    config: ActiveCacheConfig,
    items: OrderedMap<K, V>,
    active: ActiveMap<K, V>,
    clock: AgeCounter,
    selected: Option<K>,
    items_revision: u64,
    active_revision: u64,
    metrics: ActiveCacheMetrics,
}

impl<K: Ord + Clone, V: Clone> ActiveCache<K, V> {
    /// Creates an empty cache keeping at most `limit` entries materialized.
    pub fn new(limit: Option<NonZeroUsize>) -> Self {
        let config = ActiveCacheConfig {
            limit,
            ..ActiveCacheConfig::default()
        };
        Self::init(config, core::iter::empty())
    }

    /// Creates an empty cache from an unvalidated limit.
    ///
    /// Returns an error if `limit` is `Some(0)`.
    pub fn try_new(limit: Option<usize>) -> Result<Self, ConfigError> {
        let config = ActiveCacheConfig::try_new(limit)?;
        Ok(Self::init(config, core::iter::empty()))
    }

    /// Creates a cache holding `items` and materializes the initial subset.
    ///
    /// The initial subset is the first `limit` items in key order (all of
    /// them when unbounded), born at the configured initial age. If `items`
    /// repeats a key, the first occurrence wins, as with
    /// [`insert_batch`](Self::insert_batch).
    pub fn init<I>(config: ActiveCacheConfig, items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut full = OrderedMap::new();
        full.union_keep_existing(items);

        let clock = AgeCounter::starting_at(config.initial_age());
        let initial = truncate_to_limit(&full, config.limit);
        let truncated = full.len() - initial.len();
        let active = ActiveMap::populate(initial, clock.current());

        let max_entries = config.limit.map_or(0, |n| n.get() as u64);
        let mut metrics = ActiveCacheMetrics::new(max_entries);
        metrics.truncated = truncated as u64;
        metrics.core.set_current_entries(active.len() as u64);

        tracing::trace!(
            items = full.len(),
            materialized = active.len(),
            truncated,
            "initialized active cache"
        );

        ActiveCache {
            config,
            items: full,
            active,
            clock,
            selected: None,
            items_revision: 0,
            active_revision: 0,
            metrics,
        }
    }

    /// The configured limit, `None` when unbounded.
    #[inline]
    pub fn limit(&self) -> Option<NonZeroUsize> {
        self.config.limit
    }

    /// The configuration the cache was created with.
    #[inline]
    pub fn config(&self) -> &ActiveCacheConfig {
        &self.config
    }

    /// The most recently issued age.
    #[inline]
    pub fn age(&self) -> Age {
        self.clock.current()
    }

    /// Number of items in the full item set.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the full item set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of materialized entries.
    #[inline]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Looks up an item in the full item set.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.items.get(key)
    }

    /// Returns `true` if the full item set holds `key`.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.items.contains_key(key)
    }

    /// Looks up a materialized value.
    #[inline]
    pub fn get_active<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.active.get(key)
    }

    /// Returns `true` if `key` is materialized.
    #[inline]
    pub fn is_active<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.active.contains_key(key)
    }

    /// Age at which a materialized key was last promoted.
    #[inline]
    pub fn born_at<Q>(&self, key: &Q) -> Option<Age>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.active.born_at(key)
    }

    /// Key resolved by the most recent successful selection.
    #[inline]
    pub fn selected(&self) -> Option<&K> {
        self.selected.as_ref()
    }

    /// Ordered iterator over the full item set.
    #[inline]
    pub fn items(&self) -> btree_map::Iter<'_, K, V> {
        self.items.iter()
    }

    /// Ordered iterator over the materialized subset, ages stripped.
    #[inline]
    pub fn active(&self) -> Iter<'_, K, V> {
        self.active.iter()
    }

    /// The materialized subset including age tags.
    #[inline]
    pub fn active_map(&self) -> &ActiveMap<K, V> {
        &self.active
    }

    /// Copies the materialized subset into a plain ordered map.
    pub fn to_active_map(&self) -> BTreeMap<K, V> {
        self.active.to_btree_map()
    }

    /// Revision of the full item set; changes whenever the set changes.
    #[inline]
    pub fn items_revision(&self) -> u64 {
        self.items_revision
    }

    /// Revision of the materialized subset; changes whenever the subset or
    /// the selected key changes.
    #[inline]
    pub fn active_revision(&self) -> u64 {
        self.active_revision
    }

    /// Selection and eviction statistics.
    #[inline]
    pub fn stats(&self) -> &ActiveCacheMetrics {
        &self.metrics
    }

    /// Merges a batch of items into the full item set.
    ///
    /// Keys already present keep their current value. The materialized subset
    /// is not touched. Returns the number of newly added items.
    pub fn insert_batch<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let added = self.items.union_keep_existing(batch);
        if added > 0 {
            self.items_revision += 1;
        }
        tracing::trace!(added, items = self.items.len(), "merged insert batch");
        added
    }

    /// Adds a single item unless its key is already present.
    ///
    /// Returns `true` if the item was added.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.insert_batch(core::iter::once((key, value))) == 1
    }

    /// Removes `key` from the full item set.
    ///
    /// A materialized copy of the item stays live until evicted.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let removed = self.items.remove(key);
        if removed.is_some() {
            self.items_revision += 1;
        }
        removed
    }

    /// Removes every listed key from the full item set.
    ///
    /// Returns the number of removed items.
    pub fn remove_keys<'a, I, Q>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a Q>,
        K: Borrow<Q>,
        Q: ?Sized + Ord + 'a,
    {
        let removed = keys
            .into_iter()
            .filter(|key| self.items.remove(*key).is_some())
            .count();
        if removed > 0 {
            self.items_revision += 1;
        }
        tracing::trace!(removed, items = self.items.len(), "removed keys");
        removed
    }

    /// Keeps only the items for which `keep` returns `true`.
    ///
    /// Returns the number of removed items.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let removed = self.items.retain(|k, v| keep(k, v));
        if removed > 0 {
            self.items_revision += 1;
        }
        tracing::trace!(removed, items = self.items.len(), "retained items");
        removed
    }

    /// Applies `f` to the value of `key`.
    ///
    /// The change reaches both the full item set and, if `key` is
    /// materialized, the live entry; its age is unchanged. A materialized
    /// entry whose item was deleted from the full set is updated on its own.
    /// Returns `true` if anything was updated.
    pub fn update<Q, F>(&mut self, key: &Q, mut f: F) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
        F: FnMut(&mut V),
    {
        let in_items = match self.items.get_mut(key) {
            Some(value) => {
                f(value);
                self.items_revision += 1;
                true
            }
            None => false,
        };

        let in_active = match self.active.get_mut(key) {
            Some(live) => {
                match self.items.get(key) {
                    Some(value) => *live = value.clone(),
                    None => f(live),
                }
                self.active_revision += 1;
                true
            }
            None => false,
        };

        in_items || in_active
    }

    /// Replaces the value of `key` in both views.
    ///
    /// Returns `true` if the key was present in either.
    pub fn set<Q>(&mut self, key: &Q, value: V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.update(key, |slot| *slot = value.clone())
    }

    /// Applies `f` to every value in both views.
    ///
    /// Returns the number of items updated in the full item set.
    pub fn update_all<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&K, &mut V),
    {
        let mut updated = 0;
        for (key, value) in self.items.iter_mut() {
            f(key, value);
            updated += 1;
        }

        let items = &self.items;
        let mut touched_active = false;
        for (key, live) in self.active.values_mut() {
            match items.get(key) {
                Some(value) => *live = value.clone(),
                None => f(key, live),
            }
            touched_active = true;
        }

        if updated > 0 {
            self.items_revision += 1;
        }
        if touched_active {
            self.active_revision += 1;
        }
        updated
    }

    /// Handles a selection change.
    ///
    /// Advances the age, resolves `key` against the full item set (exact,
    /// then predecessor, then successor) and materializes the match with the
    /// new age, evicting the oldest entry if the limit is reached. Returns
    /// `None` without touching the materialized subset when the full item set
    /// is empty; the age is consumed either way.
    pub fn select<Q>(&mut self, key: &Q) -> Option<Selected<K, V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let age = self.clock.tick();

        let resolved = find_nearest(&self.items, key)
            .map(|hit| (hit.key.clone(), hit.value.clone(), hit.kind));
        self.metrics
            .record_resolution(resolved.as_ref().map(|(_, _, kind)| *kind));

        let Some((key, value, kind)) = resolved else {
            self.metrics.core.record_miss();
            tracing::trace!(age = age.get(), "selection did not resolve to any item");
            return None;
        };

        let refreshed = self.active.contains_key::<K>(&key);
        if refreshed {
            self.metrics.record_refresh();
        } else {
            self.metrics.core.record_miss();
        }

        let evicted = bounded_insert(self.config.limit, age, key.clone(), value, &mut self.active);
        if evicted.is_some() {
            self.metrics.core.record_eviction();
        }
        if !refreshed || evicted.as_ref().is_some_and(|(victim, _)| *victim == key) {
            self.metrics.core.record_insertion();
        }
        self.metrics
            .core
            .set_current_entries(self.active.len() as u64);

        tracing::trace!(
            age = age.get(),
            kind = ?kind,
            refreshed,
            evicted = evicted.is_some(),
            materialized = self.active.len(),
            "selection resolved"
        );

        self.selected = Some(key.clone());
        self.active_revision += 1;

        Some(Selected {
            key,
            kind,
            age,
            refreshed,
            evicted,
        })
    }

    /// Renders every materialized entry with `render` and collects the
    /// results by key.
    ///
    /// `render` receives the key, the live value and whether the key is the
    /// one resolved by the most recent selection. Entries are visited in key
    /// order.
    pub fn render_with<R, F>(&self, mut render: F) -> BTreeMap<K, R>
    where
        F: FnMut(&K, &V, bool) -> R,
    {
        self.active
            .iter()
            .map(|(key, value)| {
                let is_selected = self.selected.as_ref() == Some(key);
                (key.clone(), render(key, value, is_selected))
            })
            .collect()
    }

    /// Drops every item and materialized entry.
    ///
    /// The age counter keeps running so later ages stay monotonic.
    pub fn clear(&mut self) {
        self.items.clear();
        self.active.clear();
        self.selected = None;
        self.items_revision += 1;
        self.active_revision += 1;
        self.metrics.core.set_current_entries(0);
    }
}

impl<K: Ord + Clone, V: Clone> CacheMetrics for ActiveCache<K, V> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.metrics.algorithm_name()
    }
}

impl<K, V> fmt::Debug for ActiveCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveCache")
            .field("limit", &self.config.limit)
            .field("age", &self.clock.current())
            .field("items_revision", &self.items_revision)
            .field("active_revision", &self.active_revision)
            .finish()
    }
}
