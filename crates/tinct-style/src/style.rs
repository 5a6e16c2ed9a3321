#![forbid(unsafe_code)]

//! Styled text rendering.
//!
//! A [`Style`] is a plain value: colors plus attribute flags. Rendering fits
//! the colors to a [`ColorProfile`] through a [`Converter`] and wraps the
//! text in one SGR sequence.

use std::sync::Arc;

use smallvec::SmallVec;
use unicode_width::UnicodeWidthStr;

use crate::color::{Color, ColorProfile};
use crate::convert::Converter;
use crate::sequence::{self, Layer};

bitflags::bitflags! {
    /// Text attribute flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u16 {
        /// Bold / increased intensity.
        const BOLD          = 0b0000_0000_0001;
        /// Dim / decreased intensity.
        const DIM           = 0b0000_0000_0010;
        /// Italic text.
        const ITALIC        = 0b0000_0000_0100;
        /// Underlined text.
        const UNDERLINE     = 0b0000_0000_1000;
        /// Blinking text.
        const BLINK         = 0b0000_0001_0000;
        /// Reverse video (swap fg/bg).
        const REVERSE       = 0b0000_0010_0000;
        /// Hidden / invisible text.
        const HIDDEN        = 0b0000_0100_0000;
        /// Strikethrough text.
        const STRIKETHROUGH = 0b0000_1000_0000;
        /// Line over the text.
        const OVERLINE      = 0b0001_0000_0000;
    }
}

/// SGR code for each flag, in emission order.
const FLAG_CODES: [(StyleFlags, &str); 9] = [
    (StyleFlags::BOLD, "1"),
    (StyleFlags::DIM, "2"),
    (StyleFlags::ITALIC, "3"),
    (StyleFlags::UNDERLINE, "4"),
    (StyleFlags::BLINK, "5"),
    (StyleFlags::REVERSE, "7"),
    (StyleFlags::HIDDEN, "8"),
    (StyleFlags::STRIKETHROUGH, "9"),
    (StyleFlags::OVERLINE, "53"),
];

impl StyleFlags {
    /// SGR parameters for the set flags, in ascending code order.
    pub fn sgr_codes(self) -> impl Iterator<Item = &'static str> {
        FLAG_CODES
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, code)| *code)
    }
}

/// Foreground, background, and attributes for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Text color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Attribute flags.
    pub flags: StyleFlags,
}

impl Style {
    /// Unstyled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: Color::NoColor,
            bg: Color::NoColor,
            flags: StyleFlags::empty(),
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    /// Add attribute flags.
    #[must_use]
    pub const fn flags(mut self, flags: StyleFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    /// Add bold.
    #[must_use]
    pub const fn bold(self) -> Self {
        self.flags(StyleFlags::BOLD)
    }

    /// Add dim (faint).
    #[must_use]
    pub const fn dim(self) -> Self {
        self.flags(StyleFlags::DIM)
    }

    /// Add italic.
    #[must_use]
    pub const fn italic(self) -> Self {
        self.flags(StyleFlags::ITALIC)
    }

    /// Add underline.
    #[must_use]
    pub const fn underline(self) -> Self {
        self.flags(StyleFlags::UNDERLINE)
    }

    /// Add blink.
    #[must_use]
    pub const fn blink(self) -> Self {
        self.flags(StyleFlags::BLINK)
    }

    /// Add reverse video.
    #[must_use]
    pub const fn reverse(self) -> Self {
        self.flags(StyleFlags::REVERSE)
    }

    /// Add hidden.
    #[must_use]
    pub const fn hidden(self) -> Self {
        self.flags(StyleFlags::HIDDEN)
    }

    /// Add strikethrough.
    #[must_use]
    pub const fn strikethrough(self) -> Self {
        self.flags(StyleFlags::STRIKETHROUGH)
    }

    /// Add overline.
    #[must_use]
    pub const fn overline(self) -> Self {
        self.flags(StyleFlags::OVERLINE)
    }

    /// Whether rendering would emit nothing at any profile.
    #[must_use]
    pub const fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.flags.is_empty()
    }

    /// Wrap `text` in the SGR sequence for this style at `profile`.
    ///
    /// Under [`ColorProfile::NoColor`] the text is returned as-is, attributes
    /// included. Colors that resolve to nothing are skipped; if nothing is
    /// left, the text is returned without escapes.
    #[must_use]
    pub fn render(&self, converter: &Converter, profile: ColorProfile, text: &str) -> String {
        if profile == ColorProfile::NoColor {
            return text.to_owned();
        }
        let mut params: SmallVec<[Arc<str>; 4]> = SmallVec::new();
        params.extend(self.flags.sgr_codes().map(Arc::from));
        for (color, layer) in [(self.fg, Layer::Foreground), (self.bg, Layer::Background)] {
            let color = converter.convert(profile, color);
            if !color.is_none() {
                params.push(converter.sequence(color, layer));
            }
        }
        sequence::wrap_sgr(params.as_slice(), text)
    }
}

/// Calculate the display width of text in cells.
#[inline]
#[must_use]
pub fn display_width(text: &str) -> usize {
    text.width()
}
