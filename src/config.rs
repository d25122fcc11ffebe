//! Cache Configuration Module
//!
//! Configuration for [`ActiveCache`](crate::ActiveCache). Like the rest of the
//! crate's configuration, the struct has public fields so it can be built
//! directly; the constructors below are conveniences.
//!
//! # Sizing Guidelines
//!
//! `limit` bounds how many entries stay materialized at once. It trades memory
//! (and whatever work the caller does per live entry) against how often a
//! re-selected item has to be rebuilt after eviction:
//!
//! - `None`: every selected item stays live forever.
//! - `Some(1)`: only the current selection is live.
//! - `Some(n)`: the `n` most recently selected items stay live.
//!
//! The full item set is never bounded; `limit` only applies to the
//! materialized subset.
//!
//! # Examples
//!
//! ```
//! use active_cache::config::ActiveCacheConfig;
//! use core::num::NonZeroUsize;
//!
//! // Keep the five most recently selected items live
//! let config = ActiveCacheConfig {
//!     limit: NonZeroUsize::new(5),
//!     initial_age: 0,
//! };
//! assert_eq!(config.limit.map(NonZeroUsize::get), Some(5));
//!
//! // Validate a user-supplied limit
//! assert!(ActiveCacheConfig::try_new(Some(0)).is_err());
//! assert!(ActiveCacheConfig::try_new(None).unwrap().limit.is_none());
//! ```

use crate::age::Age;
use crate::error::ConfigError;
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for an [`ActiveCache`](crate::ActiveCache).
///
/// # Fields
///
/// - `limit`: Maximum number of materialized entries, `None` for unbounded.
///   Fixed for the lifetime of the cache.
/// - `initial_age`: Starting value of the age counter. Entries produced by
///   initial population carry this age.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ActiveCacheConfig {
    /// Maximum number of materialized entries, `None` for unbounded.
    pub limit: Option<NonZeroUsize>,
    /// Starting value of the age counter.
    pub initial_age: u64,
}

impl ActiveCacheConfig {
    /// Configuration with no limit on the materialized subset.
    #[inline]
    pub fn unbounded() -> Self {
        Self {
            limit: None,
            initial_age: 0,
        }
    }

    /// Configuration keeping at most `limit` entries materialized.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of materialized entries
    #[inline]
    pub fn bounded(limit: NonZeroUsize) -> Self {
        Self {
            limit: Some(limit),
            initial_age: 0,
        }
    }

    /// Creates a configuration from a raw, possibly user-supplied limit.
    ///
    /// # Arguments
    ///
    /// * `limit` - Maximum number of materialized entries, `None` for unbounded
    ///
    /// # Returns
    ///
    /// An unbounded configuration for `None`, a bounded one for `Some(n)`
    /// with `n > 0`, both starting the age counter at 0.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for `Some(0)`: a zero limit would evict every
    /// entry as soon as it is inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use active_cache::config::ActiveCacheConfig;
    ///
    /// assert_eq!(ActiveCacheConfig::try_new(Some(3)).unwrap().limit.map(|n| n.get()), Some(3));
    /// assert!(ActiveCacheConfig::try_new(None).unwrap().limit.is_none());
    /// assert!(ActiveCacheConfig::try_new(Some(0)).is_err());
    /// ```
    pub fn try_new(limit: Option<usize>) -> Result<Self, ConfigError> {
        match limit {
            None => Ok(Self::unbounded()),
            Some(n) => NonZeroUsize::new(n)
                .map(Self::bounded)
                .ok_or_else(|| ConfigError::new("limit must be greater than zero")),
        }
    }

    /// Returns the age the counter starts from.
    #[inline]
    pub fn initial_age(&self) -> Age {
        Age::new(self.initial_age)
    }
}

impl Default for ActiveCacheConfig {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Debug for ActiveCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveCacheConfig")
            .field("limit", &self.limit)
            .field("initial_age", &self.initial_age)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = ActiveCacheConfig {
            limit: NonZeroUsize::new(10),
            initial_age: 3,
        };
        assert_eq!(config.limit.unwrap().get(), 10);
        assert_eq!(config.initial_age(), Age::new(3));
    }

    #[test]
    fn test_try_new_rejects_zero() {
        let err = ActiveCacheConfig::try_new(Some(0)).unwrap_err();
        assert!(err.message().contains("limit"));
    }

    #[test]
    fn test_try_new_accepts_positive_and_none() {
        let bounded = ActiveCacheConfig::try_new(Some(2)).unwrap();
        assert_eq!(bounded, ActiveCacheConfig::bounded(NonZeroUsize::new(2).unwrap()));

        let unbounded = ActiveCacheConfig::try_new(None).unwrap();
        assert_eq!(unbounded, ActiveCacheConfig::default());
    }
}
