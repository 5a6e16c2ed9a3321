#![forbid(unsafe_code)]

//! Cache sizing for the color pipeline.
//!
//! Every specialized cache (palette lookups, foreground sequences, background
//! sequences) gets its own capacity. A process only ever renders a handful of
//! distinct colors, so the defaults are deliberately small.
//!
//! # Environment
//!
//! [`CacheConfig::from_env`] honors `TINCT_CACHE_CAPACITY`, which overrides all
//! three capacities at once:
//!
//! ```bash
//! TINCT_CACHE_CAPACITY=32 my-app
//! ```
//!
//! A capacity of `0` disables memoization for that cache.

/// Default number of entries per specialized cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 10;

/// Environment variable read by [`CacheConfig::from_env`].
pub const CAPACITY_ENV_VAR: &str = "TINCT_CACHE_CAPACITY";

/// Capacities for the specialized color caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Entries in the RGB -> 256-color palette cache.
    /// Default: 10
    pub palette_capacity: usize,

    /// Entries in the RGB -> foreground SGR fragment cache.
    /// Default: 10
    pub foreground_capacity: usize,

    /// Entries in the RGB -> background SGR fragment cache.
    /// Default: 10
    pub background_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::uniform(DEFAULT_CACHE_CAPACITY)
    }
}

impl CacheConfig {
    /// Use the same capacity for every cache.
    #[must_use]
    pub const fn uniform(capacity: usize) -> Self {
        Self {
            palette_capacity: capacity,
            foreground_capacity: capacity,
            background_capacity: capacity,
        }
    }

    /// Defaults, overridden by `TINCT_CACHE_CAPACITY` when it is set.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_value(std::env::var(CAPACITY_ENV_VAR).ok().as_deref())
    }

    /// Apply a raw override value as read from the environment.
    ///
    /// `None` keeps the current capacities. Values that are not a non-negative
    /// integer are ignored with a warning.
    #[must_use]
    pub fn with_env_value(self, raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return self;
        };
        match raw.trim().parse::<usize>() {
            Ok(capacity) => Self::uniform(capacity),
            Err(_) => {
                crate::warn!(
                    var = CAPACITY_ENV_VAR,
                    value = raw,
                    "ignoring unparseable cache capacity"
                );
                self
            }
        }
    }
}
