//! Bounded Materialized Subset
//!
//! This module holds the eviction policy of the cache as pure operations over
//! an [`ActiveMap`], the key-ordered map of materialized entries.
//!
//! # Algorithm
//!
//! Each materialized entry carries the [`Age`] at which it was last promoted.
//! When a bounded insertion finds the map full, exactly one entry is evicted:
//! the one with the smallest age. Among entries sharing the smallest age the
//! one with the smallest key goes first. Since the cache promotes a single
//! entry per selection with a strictly increasing age, this approximates
//! least-recently-selected eviction without any wall-clock time.
//!
//! Initial population follows a different, simpler rule: with no selection
//! history yet, [`truncate_to_limit`] keeps the smallest keys.
//!
//! # Performance Characteristics
//!
//! - Insert / remove / lookup: O(log n)
//! - Finding the eviction victim: O(log n), via a secondary `(age, key)` index
//!
//! # Examples
//!
//! ```
//! use active_cache::age::Age;
//! use active_cache::bounded::{bounded_insert, ActiveMap};
//! use core::num::NonZeroUsize;
//!
//! let limit = NonZeroUsize::new(2);
//! let mut active = ActiveMap::new();
//!
//! assert_eq!(bounded_insert(limit, Age::new(1), 1, "a", &mut active), None);
//! assert_eq!(bounded_insert(limit, Age::new(2), 2, "b", &mut active), None);
//! // Full: the entry born first is evicted
//! assert_eq!(bounded_insert(limit, Age::new(3), 3, "c", &mut active), Some((1, "a")));
//! assert_eq!(active.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
//! ```

extern crate alloc;

use crate::age::Age;
use crate::entry::ActiveEntry;
use crate::ordered::OrderedMap;
use alloc::collections::btree_map::{self, BTreeMap};
use alloc::collections::BTreeSet;
use core::borrow::Borrow;
use core::iter::FusedIterator;
use core::num::NonZeroUsize;

/// Key-ordered map of materialized entries with an age index.
///
/// Mutation goes through [`bounded_insert`], [`ActiveMap::populate`] and the
/// crate's cache type, so a bounded map never holds more entries than its
/// limit.
#[derive(Debug, Clone)]
pub struct ActiveMap<K, V> {
    entries: BTreeMap<K, ActiveEntry<V>>,
    by_age: BTreeSet<(Age, K)>,
}

impl<K, V> Default for ActiveMap<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            by_age: BTreeSet::new(),
        }
    }
}

impl<K: Ord + Clone, V> ActiveMap<K, V> {
    /// Creates an empty map.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the initial materialized subset from a truncated item set.
    ///
    /// Every entry is born at `age`.
    pub fn populate<I>(items: I, age: Age) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::new();
        for (key, value) in items {
            map.insert(key, age, value);
        }
        map
    }

    /// Number of materialized entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is materialized.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `key` is materialized.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.entries.contains_key(key)
    }

    /// Value of a materialized entry.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.entries.get(key).map(ActiveEntry::value)
    }

    /// Full entry (value and age) of a materialized key.
    #[inline]
    pub fn entry<Q>(&self, key: &Q) -> Option<&ActiveEntry<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.entries.get(key)
    }

    /// Age at which `key` was last promoted.
    #[inline]
    pub fn born_at<Q>(&self, key: &Q) -> Option<Age>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.entries.get(key).map(|e| e.born_at)
    }

    /// Mutable access to a value. The entry's age is left unchanged.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.entries.get_mut(key).map(|e| &mut e.value)
    }

    /// The next eviction victim: smallest age, then smallest key.
    #[inline]
    pub fn oldest(&self) -> Option<(&K, Age)> {
        self.by_age.first().map(|(age, key)| (key, *age))
    }

    /// Ordered iterator over materialized keys and values, ages stripped.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Ordered iterator over materialized keys.
    #[inline]
    pub fn keys(&self) -> btree_map::Keys<'_, K, ActiveEntry<V>> {
        self.entries.keys()
    }

    /// Ordered iterator over keys and full entries, ages included.
    #[inline]
    pub fn entries(&self) -> btree_map::Iter<'_, K, ActiveEntry<V>> {
        self.entries.iter()
    }

    /// Copies the materialized values into a plain ordered map.
    pub fn to_btree_map(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> {
        self.entries.iter_mut().map(|(k, e)| (k, &mut e.value))
    }

    /// Inserts or overwrites without any capacity check.
    pub(crate) fn insert(&mut self, key: K, age: Age, value: V) -> Option<ActiveEntry<V>> {
        let previous = self
            .entries
            .insert(key.clone(), ActiveEntry::new(age, value));
        if let Some(prev) = &previous {
            self.by_age.remove(&(prev.born_at, key.clone()));
        }
        self.by_age.insert((age, key));
        previous
    }

    pub(crate) fn pop_oldest(&mut self) -> Option<(K, ActiveEntry<V>)> {
        let (_, key) = self.by_age.pop_first()?;
        let entry = self.entries.remove(&key)?;
        Some((key, entry))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.by_age.clear();
    }
}

/// Iterator over materialized `(key, value)` pairs in key order.
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    inner: btree_map::Iter<'a, K, ActiveEntry<V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, e)| (k, &e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, e)| (k, &e.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K: Ord + Clone, V> IntoIterator for &'a ActiveMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Returns the entries that initial population may materialize.
///
/// With no limit every entry is kept. With `Some(n)` the first `n` entries in
/// ascending key order are kept, regardless of value or insertion history.
pub fn truncate_to_limit<K, V>(
    full: &OrderedMap<K, V>,
    limit: Option<NonZeroUsize>,
) -> OrderedMap<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    let take = limit.map_or(usize::MAX, NonZeroUsize::get);
    full.iter()
        .take(take)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Inserts `key -> (age, value)` into `active`, evicting if the map is full.
///
/// - `limit = None`: insert or overwrite, never evict.
/// - `limit = Some(n)` and fewer than `n` entries: insert or overwrite.
/// - Otherwise exactly one entry is evicted first (smallest age, then smallest
///   key), even if `key` is already materialized. If `key` is itself the
///   victim it is evicted and then reinserted.
///
/// Returns the evicted entry, if any. Never fails.
pub fn bounded_insert<K, V>(
    limit: Option<NonZeroUsize>,
    age: Age,
    key: K,
    value: V,
    active: &mut ActiveMap<K, V>,
) -> Option<(K, V)>
where
    K: Ord + Clone,
{
    let mut evicted = None;

    if let Some(limit) = limit {
        if active.len() >= limit.get() {
            if let Some((victim, entry)) = active.pop_oldest() {
                tracing::debug!(
                    victim_age = entry.born_at.get(),
                    incoming_age = age.get(),
                    limit = limit.get(),
                    "evicting oldest materialized entry"
                );
                evicted = Some((victim, entry.value));
            }
        }
    }

    active.insert(key, age, value);
    evicted
}
