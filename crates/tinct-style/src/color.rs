#![forbid(unsafe_code)]

//! Color types, profiles, parsing, and the uncached downgrade path.

use std::fmt;
use std::str::FromStr;

use crate::palette;
use crate::sequence::{self, Layer};

/// Terminal color resolution, ordered from least to most expressive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorProfile {
    /// No color output.
    NoColor,
    /// Standard 16 ANSI colors.
    Ansi16,
    /// Extended 256-color palette.
    Ansi256,
    /// Full 24-bit RGB color.
    TrueColor,
}

impl ColorProfile {
    /// Every profile, lowest resolution first.
    pub const ALL: [Self; 4] = [Self::NoColor, Self::Ansi16, Self::Ansi256, Self::TrueColor];

    /// Choose the best available profile from already-detected capability flags.
    ///
    /// `no_color` should reflect explicit user intent (e.g. NO_COLOR) and wins
    /// over everything else.
    #[must_use]
    pub const fn from_flags(true_color: bool, colors_256: bool, no_color: bool) -> Self {
        if no_color {
            Self::NoColor
        } else if true_color {
            Self::TrueColor
        } else if colors_256 {
            Self::Ansi256
        } else {
            Self::Ansi16
        }
    }

    /// Check if this profile supports 24-bit true color.
    #[must_use]
    pub const fn supports_true_color(self) -> bool {
        matches!(self, Self::TrueColor)
    }

    /// Human-readable profile name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoColor => "NoColor",
            Self::Ansi16 => "ANSI",
            Self::Ansi256 => "ANSI256",
            Self::TrueColor => "TrueColor",
        }
    }
}

impl fmt::Display for ColorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form.
    #[must_use]
    pub fn hex(self) -> String {
        self.to_string()
    }

    /// Parse `#rrggbb` or the `#rgb` shorthand. Hex digits are case-insensitive.
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let invalid = || ColorParseError::InvalidHex(input.to_owned());
        let digits = input.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            // #abc expands to #aabbcc
            3 => {
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// ANSI 16-color indices (0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ansi16 {
    /// Black (index 0).
    Black = 0,
    /// Red (index 1).
    Red = 1,
    /// Green (index 2).
    Green = 2,
    /// Yellow (index 3).
    Yellow = 3,
    /// Blue (index 4).
    Blue = 4,
    /// Magenta (index 5).
    Magenta = 5,
    /// Cyan (index 6).
    Cyan = 6,
    /// White (index 7).
    White = 7,
    /// Bright black (index 8).
    BrightBlack = 8,
    /// Bright red (index 9).
    BrightRed = 9,
    /// Bright green (index 10).
    BrightGreen = 10,
    /// Bright yellow (index 11).
    BrightYellow = 11,
    /// Bright blue (index 12).
    BrightBlue = 12,
    /// Bright magenta (index 13).
    BrightMagenta = 13,
    /// Bright cyan (index 14).
    BrightCyan = 14,
    /// Bright white (index 15).
    BrightWhite = 15,
}

impl Ansi16 {
    /// Return the raw ANSI index (0–15).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Convert a `u8` index to an `Ansi16` variant, returning `None` if out of range.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Black),
            1 => Some(Self::Red),
            2 => Some(Self::Green),
            3 => Some(Self::Yellow),
            4 => Some(Self::Blue),
            5 => Some(Self::Magenta),
            6 => Some(Self::Cyan),
            7 => Some(Self::White),
            8 => Some(Self::BrightBlack),
            9 => Some(Self::BrightRed),
            10 => Some(Self::BrightGreen),
            11 => Some(Self::BrightYellow),
            12 => Some(Self::BrightBlue),
            13 => Some(Self::BrightMagenta),
            14 => Some(Self::BrightCyan),
            15 => Some(Self::BrightWhite),
            _ => None,
        }
    }
}

/// A color value at varying fidelity levels.
///
/// `NoColor` is the sentinel for "leave the text unstyled"; every failed
/// resolution ends up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// No color applied.
    #[default]
    NoColor,
    /// Standard 16-color ANSI value.
    Ansi16(Ansi16),
    /// 256-color palette index.
    Ansi256(u8),
    /// True-color RGB value.
    Rgb(Rgb),
}

impl Color {
    /// Create a true-color RGB value.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb(Rgb::new(r, g, b))
    }

    /// Whether this is the no-color sentinel.
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::NoColor)
    }

    /// The lowest profile able to show this color without loss.
    #[must_use]
    pub const fn profile(self) -> ColorProfile {
        match self {
            Self::NoColor => ColorProfile::NoColor,
            Self::Ansi16(_) => ColorProfile::Ansi16,
            Self::Ansi256(_) => ColorProfile::Ansi256,
            Self::Rgb(_) => ColorProfile::TrueColor,
        }
    }

    /// Canonical RGB for this color, `None` for [`Color::NoColor`].
    ///
    /// Indices 0–15 use the xterm defaults; real terminals may be themed.
    #[must_use]
    pub fn to_rgb(self) -> Option<Rgb> {
        match self {
            Self::NoColor => None,
            Self::Ansi16(color) => Some(palette::ansi16_to_rgb(color)),
            Self::Ansi256(idx) => Some(palette::ansi256_to_rgb(idx)),
            Self::Rgb(rgb) => Some(rgb),
        }
    }

    /// SGR parameters selecting this color on `layer`, without `CSI` or `m`.
    #[must_use]
    pub fn sgr_params(self, layer: Layer) -> String {
        sequence::sgr_params(self, layer)
    }

    /// Downgrade this color to fit the given profile, without any caching.
    ///
    /// Colors already at or below the profile's resolution pass through.
    /// The memoizing [`Converter`](crate::Converter) always agrees with this.
    #[must_use]
    pub fn downgrade(self, profile: ColorProfile) -> Self {
        if profile == ColorProfile::NoColor {
            return Self::NoColor;
        }
        if self.profile() <= profile {
            return self;
        }
        match (self, profile) {
            (Self::Rgb(rgb), ColorProfile::Ansi256) => Self::Ansi256(palette::nearest_ansi256(rgb)),
            (Self::Rgb(rgb), ColorProfile::Ansi16) => {
                Self::Ansi16(palette::ansi256_to_ansi16(palette::nearest_ansi256(rgb)))
            }
            (Self::Ansi256(idx), ColorProfile::Ansi16) => {
                Self::Ansi16(palette::ansi256_to_ansi16(idx))
            }
            _ => self,
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from(channels: (u8, u8, u8)) -> Self {
        Self::Rgb(channels.into())
    }
}

impl From<Ansi16> for Color {
    fn from(color: Ansi16) -> Self {
        Self::Ansi16(color)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts `#rrggbb`, `#rgb`, or a decimal palette index `0..=255`.
    /// Indices below 16 become [`Color::Ansi16`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if s.starts_with('#') {
            return Rgb::from_hex(s).map(Self::Rgb);
        }
        let index: u8 = s
            .parse()
            .map_err(|_| ColorParseError::InvalidIndex(s.to_owned()))?;
        Ok(Ansi16::from_u8(index).map_or(Self::Ansi256(index), Self::Ansi16))
    }
}

/// Error for color specifications that cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The input was empty.
    Empty,
    /// The input started with `#` but was not `#rgb` or `#rrggbb`.
    InvalidHex(String),
    /// The input was neither hex nor a decimal index in `0..=255`.
    InvalidIndex(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty color specification"),
            Self::InvalidHex(input) => write!(f, "malformed hex color {input:?}"),
            Self::InvalidIndex(input) => write!(f, "color index {input:?} is not in 0..=255"),
        }
    }
}

impl std::error::Error for ColorParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    // --- ColorProfile tests ---

    #[test]
    fn profiles_are_ordered_by_resolution() {
        assert!(ColorProfile::NoColor < ColorProfile::Ansi16);
        assert!(ColorProfile::Ansi16 < ColorProfile::Ansi256);
        assert!(ColorProfile::Ansi256 < ColorProfile::TrueColor);
        let mut sorted = ColorProfile::ALL;
        sorted.sort();
        assert_eq!(sorted, ColorProfile::ALL);
    }

    #[test]
    fn profile_from_flags_prefers_no_color() {
        assert_eq!(
            ColorProfile::from_flags(true, true, true),
            ColorProfile::NoColor
        );
        assert_eq!(
            ColorProfile::from_flags(true, false, false),
            ColorProfile::TrueColor
        );
        assert_eq!(
            ColorProfile::from_flags(false, true, false),
            ColorProfile::Ansi256
        );
        assert_eq!(
            ColorProfile::from_flags(false, false, false),
            ColorProfile::Ansi16
        );
    }

    #[test]
    fn supports_true_color() {
        assert!(ColorProfile::TrueColor.supports_true_color());
        assert!(!ColorProfile::Ansi256.supports_true_color());
        assert!(!ColorProfile::Ansi16.supports_true_color());
        assert!(!ColorProfile::NoColor.supports_true_color());
    }

    #[test]
    fn profile_names() {
        assert_eq!(ColorProfile::NoColor.to_string(), "NoColor");
        assert_eq!(ColorProfile::Ansi16.name(), "ANSI");
        assert_eq!(ColorProfile::Ansi256.name(), "ANSI256");
        assert_eq!(ColorProfile::TrueColor.name(), "TrueColor");
    }

    // --- Rgb tests ---

    #[test]
    fn rgb_hex_is_lowercase_and_padded() {
        assert_eq!(Rgb::new(0xab, 0x0c, 0xef).hex(), "#ab0cef");
        assert_eq!(Rgb::new(0, 0, 0).to_string(), "#000000");
    }

    #[test]
    fn rgb_from_hex_long_and_short() {
        assert_eq!(Rgb::from_hex("#FF8800"), Ok(Rgb::new(255, 136, 0)));
        assert_eq!(Rgb::from_hex("#f80"), Ok(Rgb::new(255, 136, 0)));
        assert_eq!(Rgb::from_hex("#c0ffee"), Ok(Rgb::new(0xc0, 0xff, 0xee)));
    }

    #[test]
    fn rgb_from_hex_rejects_malformed() {
        for bad in ["ff0000", "#", "#ff00", "#ff00000", "#gg0000", "#ff00é", "#+f0000"] {
            assert!(
                matches!(Rgb::from_hex(bad), Err(ColorParseError::InvalidHex(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    // --- Ansi16 tests ---

    #[test]
    fn ansi16_from_u8_valid_range() {
        for i in 0..=15 {
            assert_eq!(Ansi16::from_u8(i).map(Ansi16::as_u8), Some(i));
        }
    }

    #[test]
    fn ansi16_from_u8_invalid() {
        assert!(Ansi16::from_u8(16).is_none());
        assert!(Ansi16::from_u8(255).is_none());
    }

    // --- Parsing ---

    #[test]
    fn parse_hex_and_indices() {
        assert_eq!("#ff0000".parse::<Color>(), Ok(Color::rgb(255, 0, 0)));
        assert_eq!("0".parse::<Color>(), Ok(Color::Ansi16(Ansi16::Black)));
        assert_eq!("15".parse::<Color>(), Ok(Color::Ansi16(Ansi16::BrightWhite)));
        assert_eq!("16".parse::<Color>(), Ok(Color::Ansi256(16)));
        assert_eq!("255".parse::<Color>(), Ok(Color::Ansi256(255)));
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Color>(), Err(ColorParseError::Empty));
        assert_eq!(
            "notacolor".parse::<Color>(),
            Err(ColorParseError::InvalidIndex("notacolor".into()))
        );
        assert_eq!(
            "256".parse::<Color>(),
            Err(ColorParseError::InvalidIndex("256".into()))
        );
        assert_eq!(
            "-1".parse::<Color>(),
            Err(ColorParseError::InvalidIndex("-1".into()))
        );
        assert_eq!(
            "#12345".parse::<Color>(),
            Err(ColorParseError::InvalidHex("#12345".into()))
        );
    }

    #[test]
    fn parse_error_messages() {
        assert_eq!(ColorParseError::Empty.to_string(), "empty color specification");
        assert_eq!(
            ColorParseError::InvalidHex("#zz".into()).to_string(),
            "malformed hex color \"#zz\""
        );
    }

    // --- Downgrade ---

    #[test]
    fn truecolor_passthrough() {
        let color = Color::rgb(12, 34, 56);
        assert_eq!(color.downgrade(ColorProfile::TrueColor), color);
    }

    #[test]
    fn no_color_profile_strips_everything() {
        for color in [
            Color::rgb(1, 2, 3),
            Color::Ansi256(100),
            Color::Ansi16(Ansi16::Red),
            Color::NoColor,
        ] {
            assert_eq!(color.downgrade(ColorProfile::NoColor), Color::NoColor);
        }
    }

    #[test]
    fn simpler_colors_pass_through() {
        let red = Color::Ansi16(Ansi16::Red);
        for profile in [ColorProfile::Ansi16, ColorProfile::Ansi256, ColorProfile::TrueColor] {
            assert_eq!(red.downgrade(profile), red);
        }
        let idx = Color::Ansi256(100);
        assert_eq!(idx.downgrade(ColorProfile::Ansi256), idx);
        assert_eq!(idx.downgrade(ColorProfile::TrueColor), idx);
        assert_eq!(Color::NoColor.downgrade(ColorProfile::TrueColor), Color::NoColor);
    }

    #[test]
    fn rgb_downgrades_through_palette() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(red.downgrade(ColorProfile::Ansi256), Color::Ansi256(196));
        assert_eq!(
            red.downgrade(ColorProfile::Ansi16),
            Color::Ansi16(Ansi16::BrightRed)
        );
    }

    #[test]
    fn ansi256_downgrades_through_table() {
        assert_eq!(
            Color::Ansi256(196).downgrade(ColorProfile::Ansi16),
            Color::Ansi16(Ansi16::BrightRed)
        );
        assert_eq!(
            Color::Ansi256(4).downgrade(ColorProfile::Ansi16),
            Color::Ansi16(Ansi16::Blue)
        );
    }

    #[test]
    fn color_to_rgb_all_variants() {
        assert_eq!(Color::rgb(1, 2, 3).to_rgb(), Some(Rgb::new(1, 2, 3)));
        assert_eq!(Color::Ansi256(196).to_rgb(), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Color::Ansi16(Ansi16::Black).to_rgb(), Some(Rgb::new(0, 0, 0)));
        assert_eq!(Color::NoColor.to_rgb(), None);
    }

    #[test]
    fn color_profile_of_each_variant() {
        assert_eq!(Color::NoColor.profile(), ColorProfile::NoColor);
        assert_eq!(Color::Ansi16(Ansi16::Cyan).profile(), ColorProfile::Ansi16);
        assert_eq!(Color::Ansi256(17).profile(), ColorProfile::Ansi256);
        assert_eq!(Color::rgb(0, 0, 0).profile(), ColorProfile::TrueColor);
        assert!(Color::default().is_none());
    }

    #[test]
    fn tuple_conversions() {
        assert_eq!(Rgb::from((1, 2, 3)), Rgb::new(1, 2, 3));
        assert_eq!(Color::from((0xc0, 0xff, 0xee)), Color::rgb(0xc0, 0xff, 0xee));
        let red: Color = (255, 0, 0).into();
        assert_eq!(red.downgrade(ColorProfile::Ansi256), Color::Ansi256(196));
    }
}
