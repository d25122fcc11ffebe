//! Error types for the active cache.
//!
//! Every cache operation is total: lookups that find nothing return `None`
//! rather than an error. The only failure is an invalid configuration, which
//! is reported by the fallible constructors
//! ([`ActiveCacheConfig::try_new`](crate::config::ActiveCacheConfig::try_new)
//! and [`ActiveCache::try_new`](crate::ActiveCache::try_new)).
//!
//! # Examples
//!
//! ```
//! use active_cache::config::ActiveCacheConfig;
//!
//! let err = ActiveCacheConfig::try_new(Some(0)).unwrap_err();
//! assert!(err.to_string().contains("limit"));
//! ```

extern crate alloc;

use alloc::string::String;
use core::fmt;

/// Error returned when cache configuration parameters are invalid.
///
/// Carries a human-readable description of which parameter failed
/// validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cache configuration: {}", self.0)
    }
}

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_config_error_message() {
        let err = ConfigError::new("limit must be greater than zero");
        assert_eq!(err.message(), "limit must be greater than zero");
        assert_eq!(
            err.to_string(),
            "invalid cache configuration: limit must be greater than zero"
        );
    }
}
