//! Logical Age Clock
//!
//! Every entry in the materialized subset carries an [`Age`] recording when it
//! was last promoted. Ages come from an [`AgeCounter`] that is bumped once per
//! selection-change event, so the relative order of ages reflects the order
//! in which entries were last selected. Only ordering matters; an age says
//! nothing about elapsed time.
//!
//! # Examples
//!
//! ```
//! use active_cache::age::{Age, AgeCounter};
//!
//! let mut counter = AgeCounter::new();
//! assert_eq!(counter.current(), Age::ZERO);
//!
//! let first = counter.tick();
//! let second = counter.tick();
//! assert!(first < second);
//! assert_eq!(second.get(), 2);
//! ```

use core::fmt;

/// A logical timestamp attached to a materialized entry.
///
/// Lower ages are older and are evicted first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u64);

impl Age {
    /// The age assigned to entries produced by initial population.
    pub const ZERO: Age = Age(0);

    /// Wraps a raw counter value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Age(raw)
    }

    /// Returns the raw counter value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Age {
    #[inline]
    fn from(raw: u64) -> Self {
        Age(raw)
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Monotonic counter handing out [`Age`] values.
///
/// The counter never goes backwards. It saturates at `u64::MAX` rather than
/// wrapping, which would otherwise make fresh entries look like the oldest.
#[derive(Debug, Clone, Default)]
pub struct AgeCounter {
    current: Age,
}

impl AgeCounter {
    /// Creates a counter starting at [`Age::ZERO`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a counter starting at the given age.
    #[inline]
    pub fn starting_at(age: Age) -> Self {
        Self { current: age }
    }

    /// Returns the most recently issued age without advancing.
    #[inline]
    pub fn current(&self) -> Age {
        self.current
    }

    /// Advances the counter and returns the new age.
    #[inline]
    pub fn tick(&mut self) -> Age {
        self.current = Age(self.current.0.saturating_add(1));
        self.current
    }
}
