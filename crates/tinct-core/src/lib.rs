#![forbid(unsafe_code)]

//! Core: logging facade and cache configuration shared by the tinct crates.

pub mod config;
pub mod logging;

pub use config::{CacheConfig, DEFAULT_CACHE_CAPACITY};

// Re-export tracing macros at crate root so callers write `tinct_core::debug!`
// regardless of whether the `tracing` feature is on.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, trace_span, warn};
