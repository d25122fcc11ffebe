//! Single-Result Wrapper
//!
//! [`CurrentResult`] covers the common case where only "the result for the
//! current selection" matters, and results are produced on demand by some
//! external source (a query, a computation, a request). It keeps recent
//! results live in an [`ActiveCache`] so that re-selecting something seen
//! recently does not produce it again.
//!
//! On each selection the wrapper derives a key. If that key is not
//! materialized it asks the [`ResultSource`] to fetch a result; if it is, it
//! fetches again only when [`ResultSource::refresh`] says so. A source may
//! fail to produce anything, in which case nothing is inserted and
//! [`CurrentResult::current_or`] falls back to the caller's default.
//!
//! A served result is always selected through the cache, so it gets a fresh
//! age and becomes the cache's selected key. A live result whose item was
//! deleted from the full item set is put back into it first.
//!
//! # Examples
//!
//! ```
//! use active_cache::current::{CurrentResult, ResultSource};
//! use core::num::NonZeroUsize;
//!
//! struct Squares {
//!     calls: usize,
//! }
//!
//! impl ResultSource<u32> for Squares {
//!     type Key = u32;
//!     type Value = u64;
//!
//!     fn key_for(&self, selection: &u32) -> u32 {
//!         *selection
//!     }
//!
//!     fn fetch(&mut self, selection: &u32) -> Option<(u32, u64)> {
//!         self.calls += 1;
//!         Some((*selection, u64::from(*selection).pow(2)))
//!     }
//! }
//!
//! let mut source = Squares { calls: 0 };
//! let mut current = CurrentResult::new(NonZeroUsize::new(2));
//!
//! current.select(&mut source, &3);
//! current.select(&mut source, &4);
//! current.select(&mut source, &3);
//!
//! assert_eq!(current.current_or(&0), &9);
//! assert_eq!(source.calls, 2);
//! ```

use crate::cache::ActiveCache;
use core::num::NonZeroUsize;

/// Produces results for selections.
pub trait ResultSource<S: ?Sized> {
    /// Key identifying a result.
    type Key;
    /// The result itself.
    type Value;

    /// Derives the key of the result wanted for `selection`.
    fn key_for(&self, selection: &S) -> Self::Key;

    /// Produces the result for `selection`, or `None` if it is unavailable.
    fn fetch(&mut self, selection: &S) -> Option<(Self::Key, Self::Value)>;

    /// Whether a cached result should be fetched again anyway.
    fn refresh(&self, _selection: &S, _cached: &Self::Value) -> bool {
        false
    }
}

/// How a selection was served by [`CurrentResult::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// The result was already materialized and was reused.
    Cached,
    /// The result was not materialized and was fetched.
    Fetched,
    /// The result was materialized but fetched again on request.
    Refreshed,
    /// The source produced nothing; no result was inserted.
    Unavailable,
}

/// Tracks the single result for the current selection.
#[derive(Debug)]
pub struct CurrentResult<K, V> {
    cache: ActiveCache<K, V>,
    current: Option<K>,
}

impl<K: Ord + Clone, V: Clone> CurrentResult<K, V> {
    /// Creates a wrapper keeping at most `limit` results live.
    pub fn new(limit: Option<NonZeroUsize>) -> Self {
        Self::with_cache(ActiveCache::new(limit))
    }

    /// Wraps an existing cache.
    pub fn with_cache(cache: ActiveCache<K, V>) -> Self {
        Self {
            cache,
            current: None,
        }
    }

    /// The underlying cache.
    #[inline]
    pub fn cache(&self) -> &ActiveCache<K, V> {
        &self.cache
    }

    /// Mutable access to the underlying cache, e.g. to apply bulk updates.
    #[inline]
    pub fn cache_mut(&mut self) -> &mut ActiveCache<K, V> {
        &mut self.cache
    }

    /// Key derived from the most recent selection.
    #[inline]
    pub fn current_key(&self) -> Option<&K> {
        self.current.as_ref()
    }

    /// The live result for the current selection, if any.
    pub fn current(&self) -> Option<&V> {
        self.current.as_ref().and_then(|key| self.cache.get_active(key))
    }

    /// The live result for the current selection, or `default`.
    pub fn current_or<'a>(&'a self, default: &'a V) -> &'a V {
        self.current().unwrap_or(default)
    }

    /// Handles a selection change.
    pub fn select<S, Src>(&mut self, source: &mut Src, selection: &S) -> Served
    where
        S: ?Sized,
        Src: ResultSource<S, Key = K, Value = V>,
    {
        let key = source.key_for(selection);

        let wants_refresh = self
            .cache
            .get_active(&key)
            .map(|cached| source.refresh(selection, cached));

        let served = match wants_refresh {
            Some(false) => {
                self.restore(&key);
                self.cache.select(&key);
                Served::Cached
            }
            wants_refresh => {
                let was_cached = wants_refresh.is_some();
                match source.fetch(selection) {
                    Some((fetched_key, value)) => {
                        self.store(fetched_key, value);
                        if was_cached {
                            Served::Refreshed
                        } else {
                            Served::Fetched
                        }
                    }
                    None => Served::Unavailable,
                }
            }
        };

        tracing::trace!(served = ?served, "current result selection");
        self.current = Some(key);
        served
    }

    /// Feeds a fetched result in as a one-item insert, then selects it.
    ///
    /// A key already in the full item set takes the fetched value, so a
    /// refresh is visible. Either way the key is in the full item set before
    /// the selection, which therefore resolves to it exactly.
    fn store(&mut self, key: K, value: V) {
        if self.cache.contains_key(&key) {
            self.cache.set(&key, value);
        } else {
            self.cache.insert(key.clone(), value);
        }
        self.cache.select(&key);
    }

    /// Puts a live result whose item was deleted back into the full item set.
    fn restore(&mut self, key: &K) {
        if self.cache.contains_key(key) {
            return;
        }
        if let Some(value) = self.cache.get_active(key).cloned() {
            self.cache.insert(key.clone(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;

    /// Source keyed by the selection's first character.
    struct Initials {
        fetched: Vec<String>,
        refresh_on: Option<char>,
        fail: bool,
    }

    impl Initials {
        fn new() -> Self {
            Self {
                fetched: Vec::new(),
                refresh_on: None,
                fail: false,
            }
        }
    }

    impl ResultSource<str> for Initials {
        type Key = char;
        type Value = String;

        fn key_for(&self, selection: &str) -> char {
            selection.chars().next().unwrap_or(' ')
        }

        fn fetch(&mut self, selection: &str) -> Option<(char, String)> {
            if self.fail {
                return None;
            }
            self.fetched.push(String::from(selection));
            Some((self.key_for(selection), String::from(selection)))
        }

        fn refresh(&self, selection: &str, _cached: &String) -> bool {
            self.refresh_on == Some(self.key_for(selection))
        }
    }

    #[test]
    fn test_fetches_only_when_absent() {
        let mut source = Initials::new();
        let mut current = CurrentResult::new(NonZeroUsize::new(2));

        assert_eq!(current.select(&mut source, "apple"), Served::Fetched);
        assert_eq!(current.select(&mut source, "avocado"), Served::Cached);
        assert_eq!(current.current().map(String::as_str), Some("apple"));
        assert_eq!(source.fetched, vec![String::from("apple")]);
    }

    #[test]
    fn test_refresh_predicate_refetches() {
        let mut source = Initials::new();
        source.refresh_on = Some('b');
        let mut current = CurrentResult::new(None);

        current.select(&mut source, "banana");
        assert_eq!(current.select(&mut source, "blueberry"), Served::Refreshed);
        assert_eq!(current.current().map(String::as_str), Some("blueberry"));
        assert_eq!(current.cache().get(&'b').map(String::as_str), Some("blueberry"));
    }

    #[test]
    fn test_unavailable_falls_back_to_default() {
        let mut source = Initials::new();
        source.fail = true;
        let mut current = CurrentResult::new(NonZeroUsize::new(1));
        let default = String::from("nothing yet");

        assert_eq!(current.select(&mut source, "cherry"), Served::Unavailable);
        assert_eq!(current.current_or(&default), "nothing yet");
        assert_eq!(current.current_key(), Some(&'c'));
        assert_eq!(current.cache().active_len(), 0);
    }

    #[test]
    fn test_refresh_of_deleted_live_result_stores_it_again() {
        let mut source = Initials::new();
        source.refresh_on = Some('a');
        let mut current = CurrentResult::new(NonZeroUsize::new(1));

        current.select(&mut source, "apple");
        current.cache_mut().remove(&'a');
        current.cache_mut().insert('b', String::from("banana"));

        assert_eq!(current.select(&mut source, "avocado"), Served::Refreshed);
        assert_eq!(current.current().map(String::as_str), Some("avocado"));
        assert_eq!(current.cache().selected(), Some(&'a'));
        assert_eq!(current.cache().get(&'a').map(String::as_str), Some("avocado"));
        assert!(!current.cache().is_active(&'b'));
    }

    #[test]
    fn test_cached_deleted_result_is_reaged() {
        let mut source = Initials::new();
        let mut current = CurrentResult::new(NonZeroUsize::new(2));

        current.select(&mut source, "apple");
        current.cache_mut().remove(&'a');
        current.cache_mut().insert('b', String::from("banana"));
        current.cache_mut().select(&'b');

        assert_eq!(current.select(&mut source, "apricot"), Served::Cached);
        assert_eq!(current.cache().selected(), Some(&'a'));
        assert!(current.cache().born_at(&'a') > current.cache().born_at(&'b'));
        assert_eq!(current.cache().get(&'a').map(String::as_str), Some("apple"));
        assert_eq!(source.fetched.len(), 1);
    }

    #[test]
    fn test_evicted_result_is_fetched_again() {
        let mut source = Initials::new();
        let mut current = CurrentResult::new(NonZeroUsize::new(1));

        current.select(&mut source, "apple");
        current.select(&mut source, "banana");
        assert!(!current.cache().is_active(&'a'));
        assert_eq!(current.select(&mut source, "apricot"), Served::Fetched);
        assert_eq!(source.fetched.len(), 3);
        assert_eq!(current.current().map(String::as_str), Some("apricot"));
    }
}
