#![forbid(unsafe_code)]

//! SGR parameter fragments for colors and text attributes.
//!
//! Fragments are the part between `CSI` and the final `m`, so several can be
//! joined with `;` into a single sequence.
//!
//! | Color | Foreground | Background |
//! |-------|------------|------------|
//! | 16-color 0–7 | `30`–`37` | `40`–`47` |
//! | 16-color 8–15 | `90`–`97` | `100`–`107` |
//! | 256-color | `38;5;n` | `48;5;n` |
//! | RGB | `38;2;r;g;b` | `48;2;r;g;b` |

use crate::color::Color;

/// Control Sequence Introducer.
pub const CSI: &str = "\x1b[";

/// Full SGR reset: `CSI 0 m`
pub const SGR_RESET: &str = "\x1b[0m";

/// Which side of the cell a color applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Text color.
    Foreground,
    /// Cell background.
    Background,
}

/// SGR parameters selecting `color` on `layer`. Empty for [`Color::NoColor`].
#[must_use]
pub fn sgr_params(color: Color, layer: Layer) -> String {
    let extended = match layer {
        Layer::Foreground => 38,
        Layer::Background => 48,
    };
    match color {
        Color::NoColor => String::new(),
        Color::Ansi16(ansi) => {
            let index = ansi.as_u8();
            let code = match (layer, index < 8) {
                (Layer::Foreground, true) => 30 + index,
                (Layer::Foreground, false) => 90 + index - 8,
                (Layer::Background, true) => 40 + index,
                (Layer::Background, false) => 100 + index - 8,
            };
            code.to_string()
        }
        Color::Ansi256(index) => format!("{extended};5;{index}"),
        Color::Rgb(rgb) => format!("{extended};2;{};{};{}", rgb.r, rgb.g, rgb.b),
    }
}

/// Wrap `text` in a single SGR sequence built from `params`, followed by a
/// reset. Returns `text` unchanged when there are no parameters.
#[must_use]
pub fn wrap_sgr<S: AsRef<str>>(params: &[S], text: &str) -> String {
    let params = params.iter().map(AsRef::as_ref).filter(|p| !p.is_empty());
    let joined = params.collect::<Vec<_>>().join(";");
    if joined.is_empty() {
        return text.to_owned();
    }
    let mut out =
        String::with_capacity(CSI.len() * 2 + joined.len() + text.len() + SGR_RESET.len());
    out.push_str(CSI);
    out.push_str(&joined);
    out.push('m');
    out.push_str(text);
    out.push_str(SGR_RESET);
    out
}
