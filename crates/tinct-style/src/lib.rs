#![forbid(unsafe_code)]

//! Terminal color downsampling for tinct.
//!
//! This crate turns colors into what a terminal can actually show:
//! - [`Color`] / [`Rgb`] / [`Ansi16`] - color values and parsing
//! - [`ColorProfile`] - what a terminal supports, ordered by resolution
//! - [`Oklab`] - perceptual distance used for palette matching
//! - [`RgbCache`] - thread-safe bounded LRU keyed by RGB
//! - [`Converter`] / [`ColorContext`] - memoized profile conversion
//! - [`Style`] - colors plus attributes, rendered to SGR sequences
//!
//! # Example
//! ```
//! use tinct_style::{CacheConfig, Color, ColorProfile, Converter, Style};
//!
//! let converter = Converter::with_config(CacheConfig::uniform(32));
//! let warn = Style::new().bold().fg(converter.parse(ColorProfile::TrueColor, "#ff8800"));
//!
//! assert_eq!(
//!     warn.render(&converter, ColorProfile::Ansi256, "warn"),
//!     "\x1b[1;38;5;208mwarn\x1b[0m"
//! );
//! assert_eq!(warn.render(&converter, ColorProfile::NoColor, "warn"), "warn");
//! ```

pub mod cache;
pub mod color;
pub mod convert;
pub mod oklab;
pub mod palette;
pub mod sequence;
pub mod style;

pub use cache::{CacheStats, RgbCache};
pub use color::{Ansi16, Color, ColorParseError, ColorProfile, Rgb};
pub use convert::{ColorContext, ContextStats, Converter};
pub use oklab::Oklab;
pub use sequence::Layer;
pub use style::{Style, StyleFlags, display_width};
pub use tinct_core::CacheConfig;
