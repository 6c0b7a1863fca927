//! Cache directives attached to pending operations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default time-to-live, in seconds, when the caller enables caching without
/// specifying one.
pub const DEFAULT_TTL_SECS: u64 = 60;

/// Time-to-live policy for a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ttl {
    /// Cache the result for this many seconds. Zero means "execute but never
    /// write": nothing is stored, so subsequent reads always miss.
    Seconds(u64),
    /// Sentinel: delete the entry for this key, then execute without caching.
    Invalidate,
}

impl Ttl {
    /// Whether this policy suppresses the cache write entirely.
    #[must_use]
    pub const fn disables_write(&self) -> bool {
        matches!(self, Self::Seconds(0) | Self::Invalidate)
    }

    /// Returns the expiry duration for a store write, if any.
    #[must_use]
    pub const fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Seconds(0) | Self::Invalidate => None,
            Self::Seconds(secs) => Some(Duration::from_secs(*secs)),
        }
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Self::Seconds(DEFAULT_TTL_SECS)
    }
}

/// Caching request attached to a descriptor by the caller.
///
/// Presence of a directive is what moves a pending operation from the
/// uncached state into the cache-requested state; it is per-invocation,
/// never global. A custom key, when present, entirely replaces derived-key
/// computation and is never overwritten by a derived key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheDirective {
    /// Time-to-live for the entry.
    pub ttl: Ttl,
    /// Optional caller-supplied key.
    pub key: Option<String>,
}

impl CacheDirective {
    /// Creates a directive with the default TTL and no custom key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TTL policy.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets a caller-supplied key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ttl() {
        assert_eq!(Ttl::default(), Ttl::Seconds(DEFAULT_TTL_SECS));
    }

    #[test]
    fn test_zero_ttl_disables_write() {
        assert!(Ttl::Seconds(0).disables_write());
        assert!(Ttl::Invalidate.disables_write());
        assert!(!Ttl::Seconds(1).disables_write());
    }

    #[test]
    fn test_ttl_as_duration() {
        assert_eq!(Ttl::Seconds(60).as_duration(), Some(Duration::from_secs(60)));
        assert_eq!(Ttl::Seconds(0).as_duration(), None);
        assert_eq!(Ttl::Invalidate.as_duration(), None);
    }

    #[test]
    fn test_directive_custom_key() {
        let directive = CacheDirective::new().with_key("dashboard-summary");
        assert_eq!(directive.key.as_deref(), Some("dashboard-summary"));
        assert_eq!(directive.ttl, Ttl::default());
    }
}
