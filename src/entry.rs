//! Materialized Entry Type
//!
//! An [`ActiveEntry`] is the value side of the materialized subset: the item's
//! value plus the [`Age`] at which the entry was last promoted. The age is
//! internal bookkeeping for eviction; the outbound views of the cache strip it
//! and expose only the value.
//!
//! # Examples
//!
//! ```
//! use active_cache::age::Age;
//! use active_cache::entry::ActiveEntry;
//!
//! let entry = ActiveEntry::new(Age::new(3), "row");
//! assert_eq!(entry.born_at, Age::new(3));
//! assert_eq!(entry.into_value(), "row");
//! ```

use crate::age::Age;

/// A value in the materialized subset, tagged with its promotion age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveEntry<V> {
    /// Age at which the entry was last inserted or promoted.
    pub born_at: Age,
    /// The live value.
    pub value: V,
}

impl<V> ActiveEntry<V> {
    /// Creates an entry born at `born_at`.
    #[inline]
    pub fn new(born_at: Age, value: V) -> Self {
        Self { born_at, value }
    }

    /// Borrows the value.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Drops the age tag and returns the value.
    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }
}
