#![forbid(unsafe_code)]

//! Profile conversion with memoized palette lookups.
//!
//! A [`ColorContext`] owns one cache per conversion kind and is built once at
//! startup. [`Converter`] is a cheap, cloneable handle onto a shared context
//! that render code threads through explicitly; there is no hidden global.
//!
//! # Example
//! ```
//! use tinct_style::{Ansi16, Color, ColorProfile, Converter};
//!
//! let converter = Converter::default();
//! let orange = converter.parse(ColorProfile::Ansi256, "#ff8800");
//! assert_eq!(orange, Color::Ansi256(208));
//!
//! // Malformed input degrades to no color instead of failing.
//! assert_eq!(converter.parse(ColorProfile::TrueColor, "notacolor"), Color::NoColor);
//!
//! // 16-color targets go through the same cached lookup, then a fixed table.
//! let red = converter.convert(ColorProfile::Ansi16, Color::rgb(255, 0, 0));
//! assert_eq!(red, Color::Ansi16(Ansi16::BrightRed));
//! ```

use std::sync::Arc;

use tinct_core::CacheConfig;

use crate::cache::{CacheStats, RgbCache};
use crate::color::{Color, ColorProfile, Rgb};
use crate::palette;
use crate::sequence::{self, Layer};

/// Statistics for every cache in a [`ColorContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextStats {
    /// RGB -> 256-color index cache.
    pub palette: CacheStats,
    /// RGB -> foreground fragment cache.
    pub foreground: CacheStats,
    /// RGB -> background fragment cache.
    pub background: CacheStats,
}

/// The specialized caches shared by every [`Converter`] built on it.
#[derive(Debug)]
pub struct ColorContext {
    palette: RgbCache<u8>,
    foreground: RgbCache<Arc<str>>,
    background: RgbCache<Arc<str>>,
}

impl ColorContext {
    /// Build the caches with the given capacities.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            palette: RgbCache::new("palette", config.palette_capacity),
            foreground: RgbCache::new("foreground", config.foreground_capacity),
            background: RgbCache::new("background", config.background_capacity),
        }
    }

    /// RGB -> nearest 256-color index.
    #[must_use]
    pub fn palette_cache(&self) -> &RgbCache<u8> {
        &self.palette
    }

    /// RGB -> SGR fragment for the given layer.
    #[must_use]
    pub fn sequence_cache(&self, layer: Layer) -> &RgbCache<Arc<str>> {
        match layer {
            Layer::Foreground => &self.foreground,
            Layer::Background => &self.background,
        }
    }

    /// Snapshot of every cache's counters.
    #[must_use]
    pub fn stats(&self) -> ContextStats {
        ContextStats {
            palette: self.palette.stats(),
            foreground: self.foreground.stats(),
            background: self.background.stats(),
        }
    }
}

impl Default for ColorContext {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// Resolves colors for a target profile, memoizing the expensive steps.
///
/// Output is always identical to [`Color::downgrade`]; the caches only save
/// the palette search.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    context: Arc<ColorContext>,
}

impl Converter {
    /// Handle onto an existing shared context.
    #[must_use]
    pub fn new(context: Arc<ColorContext>) -> Self {
        Self { context }
    }

    /// Handle onto a fresh context built from `config`.
    #[must_use]
    pub fn with_config(config: CacheConfig) -> Self {
        Self::new(Arc::new(ColorContext::new(config)))
    }

    /// The shared context.
    #[must_use]
    pub fn context(&self) -> &ColorContext {
        &self.context
    }

    /// Fit `color` to `profile`.
    ///
    /// - `NoColor` profile: always [`Color::NoColor`], no lookup.
    /// - Color already representable (4-bit anywhere, 8-bit at 256 or above,
    ///   RGB at true color): returned unchanged, no lookup.
    /// - RGB below true color: nearest 256-color index through the palette
    ///   cache, then the static table if the target is 16 colors.
    /// - 8-bit at 16 colors: static table only.
    #[must_use]
    pub fn convert(&self, profile: ColorProfile, color: Color) -> Color {
        if profile == ColorProfile::NoColor {
            return Color::NoColor;
        }
        if color.profile() <= profile {
            return color;
        }
        match color {
            Color::Rgb(rgb) => {
                let index = self.nearest_ansi256(rgb);
                if profile == ColorProfile::Ansi16 {
                    Color::Ansi16(palette::ansi256_to_ansi16(index))
                } else {
                    Color::Ansi256(index)
                }
            }
            Color::Ansi256(index) => Color::Ansi16(palette::ansi256_to_ansi16(index)),
            Color::NoColor | Color::Ansi16(_) => color,
        }
    }

    /// Parse a color specification and fit it to `profile`.
    ///
    /// Accepts `#rrggbb`, `#rgb`, or a decimal index `0..=255`. Anything else
    /// resolves to [`Color::NoColor`]; a bad color never aborts rendering.
    #[must_use]
    pub fn parse(&self, profile: ColorProfile, spec: &str) -> Color {
        match spec.parse::<Color>() {
            Ok(color) => self.convert(profile, color),
            #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
            Err(err) => {
                tinct_core::debug!(input = spec, error = %err, "unusable color, rendering unstyled");
                Color::NoColor
            }
        }
    }

    /// SGR fragment for `color` on `layer`, cached for RGB colors.
    #[must_use]
    pub fn sequence(&self, color: Color, layer: Layer) -> Arc<str> {
        match color {
            Color::Rgb(rgb) => self
                .context
                .sequence_cache(layer)
                .get_or_insert_with(rgb, || Arc::from(sequence::sgr_params(color, layer))),
            _ => Arc::from(sequence::sgr_params(color, layer)),
        }
    }

    fn nearest_ansi256(&self, rgb: Rgb) -> u8 {
        self.context
            .palette
            .get_or_insert_with(rgb, || palette::nearest_ansi256(rgb))
    }
}
