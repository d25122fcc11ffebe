//! Inbound Events
//!
//! An event layer that produces a single stream of changes can feed it
//! through [`ActiveCache::apply`] instead of calling the individual methods.
//! Events are applied in the order they are passed in, each one completely
//! before the next.
//!
//! # Examples
//!
//! ```
//! use active_cache::event::Event;
//! use active_cache::ActiveCache;
//! use core::num::NonZeroUsize;
//!
//! let mut cache = ActiveCache::new(NonZeroUsize::new(1));
//! let events = vec![
//!     Event::Insert(vec![(1, 10), (2, 20)]),
//!     Event::Select(2),
//!     Event::Update(Box::new(|_: &i32, v: &mut i32| *v += 1)),
//! ];
//! for event in events {
//!     cache.apply(event);
//! }
//! assert_eq!(cache.get_active(&2), Some(&21));
//! ```

extern crate alloc;

use crate::cache::{ActiveCache, Selected};
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// Predicate deciding which items survive a bulk delete.
pub type RetainFn<K, V> = Box<dyn FnMut(&K, &V) -> bool>;

/// Transformation applied to every value by a bulk update.
pub type UpdateFn<K, V> = Box<dyn FnMut(&K, &mut V)>;

/// A change to apply to an [`ActiveCache`].
pub enum Event<K, V> {
    /// Merge items into the full item set; existing keys keep their value.
    Insert(Vec<(K, V)>),
    /// Remove the listed keys from the full item set.
    Remove(Vec<K>),
    /// Remove every item the predicate rejects.
    Retain(RetainFn<K, V>),
    /// Replace the value of one key.
    Set(K, V),
    /// Transform every value.
    Update(UpdateFn<K, V>),
    /// The selection changed to this key.
    Select(K),
}

impl<K, V> fmt::Debug for Event<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Insert(batch) => f.debug_tuple("Insert").field(&batch.len()).finish(),
            Event::Remove(keys) => f.debug_tuple("Remove").field(&keys.len()).finish(),
            Event::Retain(_) => f.write_str("Retain(..)"),
            Event::Set(..) => f.write_str("Set(..)"),
            Event::Update(_) => f.write_str("Update(..)"),
            Event::Select(_) => f.write_str("Select(..)"),
        }
    }
}

/// What applying an [`Event`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied<K, V> {
    /// Number of items added by an insert.
    Inserted(usize),
    /// Number of items removed by a remove or retain.
    Removed(usize),
    /// Number of items updated (0 or 1 for a set).
    Updated(usize),
    /// Result of a selection change.
    Selected(Option<Selected<K, V>>),
}

impl<K: Ord + Clone, V: Clone> ActiveCache<K, V> {
    /// Applies a single event.
    pub fn apply(&mut self, event: Event<K, V>) -> Applied<K, V> {
        match event {
            Event::Insert(batch) => Applied::Inserted(self.insert_batch(batch)),
            Event::Remove(keys) => Applied::Removed(self.remove_keys(keys.iter())),
            Event::Retain(mut keep) => Applied::Removed(self.retain(|k, v| keep(k, v))),
            Event::Set(key, value) => Applied::Updated(usize::from(self.set(&key, value))),
            Event::Update(mut f) => Applied::Updated(self.update_all(|k, v| f(k, v))),
            Event::Select(key) => Applied::Selected(self.select(&key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::num::NonZeroUsize;

    #[test]
    fn test_apply_event_stream() {
        let mut cache: ActiveCache<i32, &str> = ActiveCache::new(NonZeroUsize::new(2));

        assert_eq!(
            cache.apply(Event::Insert(vec![(1, "a"), (2, "b"), (3, "c")])),
            Applied::Inserted(3)
        );

        match cache.apply(Event::Select(2)) {
            Applied::Selected(Some(selected)) => assert_eq!(selected.key, 2),
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(cache.apply(Event::Remove(vec![2, 9])), Applied::Removed(1));
        assert!(cache.is_active(&2));

        assert_eq!(
            cache.apply(Event::Retain(Box::new(|k: &i32, _: &&str| *k != 3))),
            Applied::Removed(1)
        );
        assert_eq!(cache.apply(Event::Set(1, "A")), Applied::Updated(1));
        assert_eq!(cache.get(&1), Some(&"A"));

        // 2 was deleted: the selection falls back to 1
        match cache.apply(Event::Select(2)) {
            Applied::Selected(Some(selected)) => assert_eq!(selected.key, 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_event_debug_hides_contents() {
        let event: Event<i32, i32> = Event::Insert(vec![(1, 1), (2, 2)]);
        assert_eq!(format!("{:?}", event), "Insert(2)");
    }
}
