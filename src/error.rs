//! Error types for the freqcache library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache construction parameters are
//!   invalid (zero capacity, out-of-range eviction factor).
//! - [`InvariantError`]: Returned when internal data-structure invariants
//!   are violated (debug-only `check_invariants` methods).
//!
//! ## Example Usage
//!
//! ```
//! use freqcache::error::ConfigError;
//! use freqcache::policy::lfu::LfuCache;
//!
//! // Fallible constructor for user-configurable parameters
//! let cache: Result<LfuCache<String, i32>, ConfigError> =
//!     LfuCache::try_with_eviction_factor(100, 0.5);
//! assert!(cache.is_ok());
//!
//! // Invalid factor is caught without panicking
//! let bad = LfuCache::<String, i32>::try_with_eviction_factor(100, 2.0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache construction parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`LfuCache::try_with_eviction_factor`](crate::policy::lfu::LfuCache::try_with_eviction_factor)
/// and [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build).
/// Carries a human-readable description of which parameter failed
/// validation.
///
/// # Example
///
/// ```
/// use freqcache::policy::lfu::LfuCache;
///
/// let err = LfuCache::<u64, u64>::try_with_eviction_factor(0, 0.5).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
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
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by debug-only `check_invariants` methods on cache types
/// (e.g. [`LfuCache::check_invariants`](crate::policy::lfu::LfuCache::check_invariants)).
/// A violation indicates index and eviction structures have diverged;
/// it is not recoverable and should surface immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
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

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
