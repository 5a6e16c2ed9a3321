#![forbid(unsafe_code)]

//! Fixed terminal palettes and nearest-color search.
//!
//! RGB input is matched against the fixed part of the 256-color palette (the
//! 6×6×6 cube at 16–231 and the gray ramp at 232–255) by Oklab distance.
//! Indices 0–15 are left out of that search because terminals theme them
//! freely. Going from 256 colors down to 16 is a table lookup, never a
//! distance computation.

use crate::color::{Ansi16, Rgb};
use crate::oklab::Oklab;

/// xterm default RGB values for the 16 ANSI colors.
pub const ANSI16_PALETTE: [Rgb; 16] = [
    Rgb::new(0, 0, 0),       // Black
    Rgb::new(205, 0, 0),     // Red
    Rgb::new(0, 205, 0),     // Green
    Rgb::new(205, 205, 0),   // Yellow
    Rgb::new(0, 0, 238),     // Blue
    Rgb::new(205, 0, 205),   // Magenta
    Rgb::new(0, 205, 205),   // Cyan
    Rgb::new(229, 229, 229), // White
    Rgb::new(127, 127, 127), // Bright Black
    Rgb::new(255, 0, 0),     // Bright Red
    Rgb::new(0, 255, 0),     // Bright Green
    Rgb::new(255, 255, 0),   // Bright Yellow
    Rgb::new(92, 92, 255),   // Bright Blue
    Rgb::new(255, 0, 255),   // Bright Magenta
    Rgb::new(0, 255, 255),   // Bright Cyan
    Rgb::new(255, 255, 255), // Bright White
];

/// Channel levels of the 6×6×6 color cube.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// First palette index considered by [`nearest_ansi256`].
const FIXED_START: u8 = 16;

/// Nearest 16-color entry for every 256-color index, by Oklab distance
/// against [`ANSI16_PALETTE`]. Indices 0–15 map to themselves.
#[rustfmt::skip]
pub static ANSI256_TO_ANSI16: [Ansi16; 256] = {
    use Ansi16 as A;
    [
    A::Black, A::Red, A::Green, A::Yellow, A::Blue, A::Magenta, A::Cyan, A::White,
    A::BrightBlack, A::BrightRed, A::BrightGreen, A::BrightYellow, A::BrightBlue, A::BrightMagenta, A::BrightCyan, A::BrightWhite,
    A::Black, A::Blue, A::Blue, A::Blue, A::Blue, A::Blue, A::BrightBlack, A::BrightBlack,
    A::BrightBlack, A::BrightBlue, A::BrightBlue, A::BrightBlue, A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlack,
    A::BrightBlue, A::BrightBlue, A::Green, A::Green, A::Cyan, A::Cyan, A::Cyan, A::Cyan,
    A::Green, A::Green, A::Green, A::Cyan, A::Cyan, A::Cyan, A::BrightGreen, A::BrightGreen,
    A::BrightGreen, A::BrightCyan, A::BrightCyan, A::BrightCyan, A::Red, A::Red, A::Blue, A::Blue,
    A::Blue, A::BrightBlue, A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlue, A::BrightBlue, A::BrightBlue,
    A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlue, A::BrightBlue, A::Green, A::Green,
    A::Cyan, A::Cyan, A::Cyan, A::Cyan, A::Green, A::Green, A::Cyan, A::Cyan,
    A::Cyan, A::Cyan, A::BrightGreen, A::BrightGreen, A::BrightGreen, A::BrightCyan, A::BrightCyan, A::BrightCyan,
    A::Red, A::Red, A::Magenta, A::Magenta, A::BrightBlue, A::BrightBlue, A::BrightBlack, A::BrightBlack,
    A::BrightBlack, A::BrightBlack, A::BrightBlue, A::BrightBlue, A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlack,
    A::BrightBlack, A::BrightBlue, A::Green, A::Green, A::Cyan, A::Cyan, A::Cyan, A::Cyan,
    A::Green, A::Yellow, A::Yellow, A::Cyan, A::Cyan, A::Cyan, A::BrightGreen, A::BrightGreen,
    A::BrightGreen, A::BrightCyan, A::BrightCyan, A::BrightCyan, A::Red, A::Red, A::Magenta, A::Magenta,
    A::Magenta, A::Magenta, A::Red, A::BrightBlack, A::BrightBlack, A::Magenta, A::Magenta, A::Magenta,
    A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlue, A::Yellow, A::Yellow,
    A::Cyan, A::Cyan, A::Cyan, A::Cyan, A::Yellow, A::Yellow, A::Yellow, A::White,
    A::White, A::White, A::BrightGreen, A::BrightYellow, A::BrightYellow, A::BrightCyan, A::BrightCyan, A::White,
    A::Red, A::Red, A::Magenta, A::Magenta, A::Magenta, A::Magenta, A::BrightRed, A::BrightRed,
    A::BrightRed, A::Magenta, A::Magenta, A::BrightMagenta, A::Yellow, A::BrightBlack, A::BrightBlack, A::BrightBlack,
    A::BrightMagenta, A::BrightMagenta, A::Yellow, A::Yellow, A::Yellow, A::White, A::White, A::White,
    A::Yellow, A::Yellow, A::Yellow, A::White, A::White, A::White, A::BrightYellow, A::BrightYellow,
    A::BrightYellow, A::BrightYellow, A::BrightWhite, A::BrightWhite, A::BrightRed, A::BrightRed, A::BrightRed, A::Magenta,
    A::BrightMagenta, A::BrightMagenta, A::BrightRed, A::BrightRed, A::BrightRed, A::BrightMagenta, A::BrightMagenta, A::BrightMagenta,
    A::BrightRed, A::BrightRed, A::BrightRed, A::BrightRed, A::BrightMagenta, A::BrightMagenta, A::Yellow, A::Yellow,
    A::White, A::White, A::White, A::White, A::Yellow, A::Yellow, A::White, A::White,
    A::White, A::White, A::BrightYellow, A::BrightYellow, A::BrightYellow, A::BrightWhite, A::BrightWhite, A::BrightWhite,
    A::Black, A::Black, A::Black, A::Black, A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlack,
    A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlack, A::BrightBlack,
    A::BrightBlack, A::Cyan, A::White, A::White, A::White, A::White, A::White, A::White,
    ]
};

/// Convert an ANSI 16-color value to its canonical RGB representation.
#[must_use]
pub fn ansi16_to_rgb(color: Ansi16) -> Rgb {
    ANSI16_PALETTE[usize::from(color.as_u8())]
}

/// Convert an ANSI 256-color index to its RGB representation.
#[must_use]
pub fn ansi256_to_rgb(index: u8) -> Rgb {
    if index < 16 {
        return ANSI16_PALETTE[usize::from(index)];
    }
    if index >= 232 {
        let gray = 8 + 10 * (index - 232);
        return Rgb::new(gray, gray, gray);
    }
    let idx = index - 16;
    let r = idx / 36;
    let g = (idx / 6) % 6;
    let b = idx % 6;
    Rgb::new(
        CUBE_LEVELS[usize::from(r)],
        CUBE_LEVELS[usize::from(g)],
        CUBE_LEVELS[usize::from(b)],
    )
}

/// Map a 256-color index to its 16-color equivalent.
#[must_use]
pub fn ansi256_to_ansi16(index: u8) -> Ansi16 {
    ANSI256_TO_ANSI16[usize::from(index)]
}

/// Find the perceptually closest 256-color index (16–255) for an RGB color.
///
/// Deterministic: on equal distance the lower index wins. This is the
/// expensive step the conversion caches exist for.
#[must_use]
pub fn nearest_ansi256(rgb: Rgb) -> u8 {
    nearest_by_oklab(Oklab::from_rgb(rgb), FIXED_START..=u8::MAX, ansi256_to_rgb)
}

/// Find the perceptually closest of the 16 ANSI colors for an RGB color.
#[must_use]
pub fn nearest_ansi16(rgb: Rgb) -> Ansi16 {
    let index = nearest_by_oklab(Oklab::from_rgb(rgb), 0..=15, |i| {
        ANSI16_PALETTE[usize::from(i)]
    });
    Ansi16::from_u8(index).unwrap_or(Ansi16::Black)
}

fn nearest_by_oklab<I, F>(target: Oklab, candidates: I, to_rgb: F) -> u8
where
    I: IntoIterator<Item = u8>,
    F: Fn(u8) -> Rgb,
{
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for index in candidates {
        let dist = target.distance_squared(Oklab::from_rgb(to_rgb(index)));
        if dist < best_dist {
            best = index;
            best_dist = dist;
        }
    }
    best
}
