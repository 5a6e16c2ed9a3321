#![forbid(unsafe_code)]

//! Oklab perceptual coordinates.
//!
//! Oklab is a Lab-style space in which Euclidean distance tracks perceived
//! color difference far better than distance between raw sRGB channels. The
//! path is gamma-encoded sRGB -> linear sRGB -> XYZ (D65) -> LMS -> cube root
//! -> Oklab.
//!
//! Matrices are those published with Oklab and used by CSS Color 4.

use crate::color::Rgb;

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const LINEAR_SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [ 0.41239079926595934, 0.357584339383878,   0.1804807884018343  ],
    [ 0.21263900587151027, 0.715168678767756,   0.07219231536073371 ],
    [ 0.01933081871559182, 0.11919477979462598, 0.9505321522496607  ],
];

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const XYZ_TO_LMS: [[f64; 3]; 3] = [
    [ 0.8190224379967030, 0.3619062600528904, -0.1288737815209879 ],
    [ 0.0329836539323885, 0.9292868615863434,  0.0361446663506424 ],
    [ 0.0481771893596242, 0.2642395317527308,  0.6335478284694309 ],
];

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const LMS_TO_OKLAB: [[f64; 3]; 3] = [
    [ 0.2104542683093140,  0.7936177747023054, -0.0040720430116193 ],
    [ 1.9779985324311684, -2.4285922420485799,  0.4505937096174110 ],
    [ 0.0259040424655478,  0.7827717124575296, -0.8086757549230774 ],
];

/// A color in Oklab: perceived lightness `l` plus opponent axes `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    /// Lightness, 0 (black) to 1 (white).
    pub l: f64,
    /// Green (negative) to red (positive).
    pub a: f64,
    /// Blue (negative) to yellow (positive).
    pub b: f64,
}

impl Oklab {
    /// Convert a gamma-encoded sRGB color.
    #[must_use]
    pub fn from_rgb(rgb: Rgb) -> Self {
        let linear = [
            decode_gamma(rgb.r),
            decode_gamma(rgb.g),
            decode_gamma(rgb.b),
        ];
        let xyz = multiply(&LINEAR_SRGB_TO_XYZ, linear);
        let [l, m, s] = multiply(&XYZ_TO_LMS, xyz);
        let [l, a, b] = multiply(&LMS_TO_OKLAB, [l.cbrt(), m.cbrt(), s.cbrt()]);
        Self { l, a, b }
    }

    /// Squared Euclidean distance. Monotonic in [`Oklab::delta_e`] and cheaper,
    /// so nearest-neighbor searches compare this.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// Perceptual difference ΔE_OK.
    #[must_use]
    pub fn delta_e(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl From<Rgb> for Oklab {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb(rgb)
    }
}

/// sRGB transfer function, 8-bit channel to linear light.
#[inline]
fn decode_gamma(channel: u8) -> f64 {
    let value = f64::from(channel) / 255.0;
    if value <= 0.04045 {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn multiply(matrix: &[[f64; 3]; 3], vector: [f64; 3]) -> [f64; 3] {
    let [row1, row2, row3] = matrix;
    [
        row1[0] * vector[0] + row1[1] * vector[1] + row1[2] * vector[2],
        row2[0] * vector[0] + row2[1] * vector[1] + row2[2] * vector[2],
        row3[0] * vector[0] + row3[1] * vector[1] + row3[2] * vector[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-9
    }

    #[test]
    fn black_is_origin() {
        let black = Oklab::from_rgb(Rgb::new(0, 0, 0));
        assert!(close(black.l, 0.0), "l={}", black.l);
        assert!(close(black.a, 0.0), "a={}", black.a);
        assert!(close(black.b, 0.0), "b={}", black.b);
    }

    #[test]
    fn white_has_unit_lightness_and_no_chroma() {
        let white = Oklab::from_rgb(Rgb::new(255, 255, 255));
        assert!(close(white.l, 1.0), "l={}", white.l);
        assert!(close(white.a, 0.0), "a={}", white.a);
        assert!(close(white.b, 0.0), "b={}", white.b);
    }

    #[test]
    fn red_matches_reference() {
        let red = Oklab::from(Rgb::new(255, 0, 0));
        assert!((red.l - 0.627_955).abs() < 1e-5, "l={}", red.l);
        assert!((red.a - 0.224_863).abs() < 1e-5, "a={}", red.a);
        assert!((red.b - 0.125_846).abs() < 1e-5, "b={}", red.b);
    }

    #[test]
    fn grays_have_no_chroma() {
        for v in [8u8, 48, 128, 200, 238] {
            let gray = Oklab::from_rgb(Rgb::new(v, v, v));
            assert!(gray.a.abs() < 1e-6 && gray.b.abs() < 1e-6, "{v}: {gray:?}");
        }
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = Oklab::from_rgb(Rgb::new(12, 200, 77));
        let b = Oklab::from_rgb(Rgb::new(240, 10, 99));
        assert_eq!(a.distance_squared(a), 0.0);
        assert_eq!(a.distance_squared(b), b.distance_squared(a));
        assert!(close(a.delta_e(b) * a.delta_e(b), a.distance_squared(b)));
    }

    #[test]
    fn perceptual_order_differs_from_channel_order() {
        // Equal channel offsets are not equal perceived differences:
        // a green shift reads larger than the same blue shift.
        let base = Oklab::from_rgb(Rgb::new(128, 128, 128));
        let greener = Oklab::from_rgb(Rgb::new(128, 168, 128));
        let bluer = Oklab::from_rgb(Rgb::new(128, 128, 168));
        assert!(base.delta_e(greener) > base.delta_e(bluer));
    }
}
