//! Nearest-Key Resolution
//!
//! A selection key handed to the cache is not guaranteed to name an item that
//! currently exists: the item may have just been deleted, or the key may be
//! derived from something that only approximates an item key. Rather than
//! failing, the cache resolves such a key to the closest reasonable entry:
//!
//! 1. the exact entry, if present;
//! 2. otherwise the entry with the greatest key strictly below (predecessor);
//! 3. otherwise the entry with the least key strictly above (successor);
//! 4. otherwise nothing, which only happens on an empty map.
//!
//! The predecessor is always preferred, even when the successor is closer in
//! value.
//!
//! # Examples
//!
//! ```
//! use active_cache::nearest::{find_nearest, MatchKind};
//! use active_cache::ordered::OrderedMap;
//!
//! let items: OrderedMap<i32, &str> = [(1, "a"), (9, "b")].into_iter().collect();
//!
//! let hit = find_nearest(&items, &5).unwrap();
//! assert_eq!((hit.key, hit.value, hit.kind), (&1, &"a", MatchKind::Predecessor));
//!
//! let hit = find_nearest(&items, &0).unwrap();
//! assert_eq!((hit.key, hit.kind), (&1, MatchKind::Successor));
//! ```

use crate::ordered::OrderedMap;
use core::borrow::Borrow;

/// How a lookup key was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// The key itself is present.
    Exact,
    /// Resolved to the greatest key below the lookup key.
    Predecessor,
    /// Resolved to the least key above the lookup key.
    Successor,
}

impl MatchKind {
    /// Returns `true` for [`MatchKind::Exact`].
    #[inline]
    pub fn is_exact(self) -> bool {
        matches!(self, MatchKind::Exact)
    }
}

/// An entry found by [`find_nearest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nearest<'a, K, V> {
    /// Key of the resolved entry.
    pub key: &'a K,
    /// Value of the resolved entry.
    pub value: &'a V,
    /// Whether the match was exact or a fallback.
    pub kind: MatchKind,
}

/// Resolves `key` against `map`: exact, then predecessor, then successor.
///
/// Pure read; returns `None` only when `map` is empty.
pub fn find_nearest<'a, K, V, Q>(map: &'a OrderedMap<K, V>, key: &Q) -> Option<Nearest<'a, K, V>>
where
    K: Ord + Borrow<Q>,
    Q: ?Sized + Ord,
{
    let tagged = |hit: Option<(&'a K, &'a V)>, kind: MatchKind| {
        hit.map(|(key, value)| Nearest { key, value, kind })
    };
    tagged(map.get_key_value(key), MatchKind::Exact)
        .or_else(|| tagged(map.predecessor(key), MatchKind::Predecessor))
        .or_else(|| tagged(map.successor(key), MatchKind::Successor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn items() -> OrderedMap<i32, &'static str> {
        [(1, "a"), (9, "b")].into_iter().collect()
    }

    #[test]
    fn test_exact_match() {
        let map = items();
        let hit = find_nearest(&map, &9).unwrap();
        assert_eq!(hit.key, &9);
        assert_eq!(hit.value, &"b");
        assert!(hit.kind.is_exact());
    }

    #[test]
    fn test_predecessor_preferred_over_closer_successor() {
        let map = items();
        let hit = find_nearest(&map, &8).unwrap();
        assert_eq!(hit.key, &1);
        assert_eq!(hit.kind, MatchKind::Predecessor);
    }

    #[test]
    fn test_successor_when_no_predecessor() {
        let map = items();
        let hit = find_nearest(&map, &0).unwrap();
        assert_eq!((hit.key, hit.value), (&1, &"a"));
        assert_eq!(hit.kind, MatchKind::Successor);
    }

    #[test]
    fn test_above_all_keys_resolves_to_last() {
        let map = items();
        let hit = find_nearest(&map, &100).unwrap();
        assert_eq!(hit.key, &9);
        assert_eq!(hit.kind, MatchKind::Predecessor);
    }

    #[test]
    fn test_empty_map_is_absent() {
        let map: OrderedMap<i32, i32> = OrderedMap::new();
        assert!(find_nearest(&map, &0).is_none());
    }

    #[test]
    fn test_singleton_always_resolves() {
        let map: OrderedMap<i32, i32> = [(3, 30)].into_iter().collect();
        for probe in [-1, 3, 7] {
            assert_eq!(find_nearest(&map, &probe).unwrap().key, &3);
        }
    }

    proptest! {
        #[test]
        fn prop_present_keys_match_exactly(
            keys in prop::collection::btree_set(any::<i16>(), 1..64)
        ) {
            let map: OrderedMap<i16, i16> = keys.iter().map(|&k| (k, k)).collect();
            for k in &keys {
                let hit = find_nearest(&map, k).unwrap();
                prop_assert_eq!(hit.key, k);
                prop_assert_eq!(hit.kind, MatchKind::Exact);
            }
        }

        #[test]
        fn prop_absent_keys_fall_back_in_order(
            keys in prop::collection::btree_set(any::<i16>(), 0..64),
            probe in any::<i16>()
        ) {
            prop_assume!(!keys.contains(&probe));
            let map: OrderedMap<i16, ()> = keys.iter().map(|&k| (k, ())).collect();
            let below = keys.range(..probe).next_back();
            let above = keys.range(probe..).next();
            let hit = find_nearest(&map, &probe);
            match (below, above) {
                (Some(b), _) => {
                    let hit = hit.unwrap();
                    prop_assert_eq!(hit.key, b);
                    prop_assert_eq!(hit.kind, MatchKind::Predecessor);
                }
                (None, Some(a)) => {
                    let hit = hit.unwrap();
                    prop_assert_eq!(hit.key, a);
                    prop_assert_eq!(hit.kind, MatchKind::Successor);
                }
                (None, None) => prop_assert!(hit.is_none()),
            }
        }
    }
}
