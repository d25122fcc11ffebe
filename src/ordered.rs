//! Key-Ordered Associative Container
//!
//! [`OrderedMap`] is a thin wrapper over [`BTreeMap`] exposing exactly the
//! operations the cache relies on: exact lookup, neighbor lookup
//! (predecessor/successor), insertion, deletion, ordered enumeration, and the
//! left-biased union used to merge bulk inserts into the full item set.
//!
//! Neighbor lookups are `O(log n)` range queries.

extern crate alloc;

use alloc::collections::btree_map::{self, BTreeMap};
use core::borrow::Borrow;
use core::ops::Bound;

/// A key-ordered map with neighbor queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<K, V> {
    map: BTreeMap<K, V>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Creates an empty map.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Exact lookup.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.get(key)
    }

    /// Exact lookup returning the stored key as well.
    #[inline]
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.get_key_value(key)
    }

    /// Mutable exact lookup.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.get_mut(key)
    }

    /// Returns `true` if `key` is present.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.contains_key(key)
    }

    /// Entry with the greatest key strictly less than `key`.
    pub fn predecessor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map
            .range::<Q, _>((Bound::Unbounded, Bound::Excluded(key)))
            .next_back()
    }

    /// Entry with the least key strictly greater than `key`.
    pub fn successor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map
            .range::<Q, _>((Bound::Excluded(key), Bound::Unbounded))
            .next()
    }

    /// Inserts or overwrites, returning the previous value.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.map.insert(key, value)
    }

    /// Removes `key`, returning its value.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.map.remove(key)
    }

    /// Keeps only the entries for which `keep` returns `true`.
    ///
    /// Returns the number of removed entries.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let before = self.map.len();
        self.map.retain(|k, v| keep(k, v));
        before - self.map.len()
    }

    /// Merges `batch` into the map. Keys already present keep their current
    /// value; the batch's value for such a key is dropped.
    ///
    /// Returns the number of newly added keys.
    pub fn union_keep_existing<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut added = 0;
        for (key, value) in batch {
            if let btree_map::Entry::Vacant(slot) = self.map.entry(key) {
                slot.insert(value);
                added += 1;
            }
        }
        added
    }

    /// First (smallest-key) entry.
    #[inline]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.map.iter().next()
    }

    /// Ordered iterator over all entries.
    #[inline]
    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.map.iter()
    }

    /// Ordered iterator over all entries with mutable values.
    #[inline]
    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, K, V> {
        self.map.iter_mut()
    }

    /// Ordered iterator over keys.
    #[inline]
    pub fn keys(&self) -> btree_map::Keys<'_, K, V> {
        self.map.keys()
    }

    /// Removes every entry.
    #[inline]
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Borrows the underlying map.
    #[inline]
    pub fn as_btree_map(&self) -> &BTreeMap<K, V> {
        &self.map
    }

    /// Unwraps into the underlying map.
    #[inline]
    pub fn into_btree_map(self) -> BTreeMap<K, V> {
        self.map
    }
}

impl<K: Ord, V> From<BTreeMap<K, V>> for OrderedMap<K, V> {
    #[inline]
    fn from(map: BTreeMap<K, V>) -> Self {
        Self { map }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    /// Collects entries; on duplicate keys the last one wins, as with
    /// [`BTreeMap`].
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = btree_map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = btree_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    fn sample() -> OrderedMap<i32, &'static str> {
        [(1, "a"), (5, "e"), (9, "i")].into_iter().collect()
    }

    #[test]
    fn test_neighbors() {
        let map = sample();
        assert_eq!(map.predecessor(&5), Some((&1, &"a")));
        assert_eq!(map.successor(&5), Some((&9, &"i")));
        assert_eq!(map.predecessor(&1), None);
        assert_eq!(map.successor(&9), None);
        assert_eq!(map.predecessor(&100), Some((&9, &"i")));
        assert_eq!(map.successor(&-100), Some((&1, &"a")));
    }

    #[test]
    fn test_neighbors_on_empty() {
        let map: OrderedMap<i32, i32> = OrderedMap::new();
        assert_eq!(map.predecessor(&0), None);
        assert_eq!(map.successor(&0), None);
        assert_eq!(map.first(), None);
    }

    #[test]
    fn test_union_keeps_existing_values() {
        let mut map = sample();
        let added = map.union_keep_existing(vec![(5, "NEW"), (7, "g")]);
        assert_eq!(added, 1);
        assert_eq!(map.get(&5), Some(&"e"));
        assert_eq!(map.get(&7), Some(&"g"));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_retain_reports_removed() {
        let mut map = sample();
        let removed = map.retain(|k, _| *k != 5);
        assert_eq!(removed, 1);
        let keys: Vec<i32> = map.keys().copied().collect();
        assert_eq!(keys, vec![1, 9]);
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut map: OrderedMap<String, i32> = OrderedMap::new();
        map.insert(String::from("apple"), 1);
        map.insert(String::from("cherry"), 3);
        assert_eq!(map.get("apple"), Some(&1));
        assert_eq!(map.predecessor("banana").map(|(_, v)| *v), Some(1));
        assert_eq!(map.successor("banana").map(|(_, v)| *v), Some(3));
    }
}
