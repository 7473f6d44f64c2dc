//! RGB and HSV color values and the conversions between them
//!
//! All conversions are total: hue is wrapped into `[0, 360)` and
//! saturation/value are clamped into `[0, 1]` instead of being rejected.

use std::fmt;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// An 8-bit sRGB color.
///
/// Serializes as a canonical `[r, g, b]` array so that stored colors
/// decode back to exactly the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case `#RRGGBB` form.
    pub fn to_hex(self) -> String {
        rgb_to_hex(self)
    }

    /// Parse `#RRGGBB` or `RRGGBB` (any case).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || AnalysisError::InvalidHex {
            value: hex.to_string(),
        };
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hsv(self) -> Hsv {
        rgb_to_hsv(self)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for RgbColor {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<RgbColor> for [u8; 3] {
    fn from(color: RgbColor) -> Self {
        color.to_array()
    }
}

impl From<Srgb<u8>> for RgbColor {
    fn from(color: Srgb<u8>) -> Self {
        Self::new(color.red, color.green, color.blue)
    }
}

impl From<RgbColor> for Srgb<u8> {
    fn from(color: RgbColor) -> Self {
        Srgb::new(color.r, color.g, color.b)
    }
}

/// A color in the HSV cylinder.
///
/// `hue` is in degrees, `saturation` and `value` in `[0, 1]`. Values built
/// by hand may lie outside those ranges; [`hsv_to_rgb`] normalizes them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl Hsv {
    pub const fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Same saturation and value, hue turned by `degrees` and wrapped into `[0, 360)`.
    ///
    /// Backward turns add a full circle before taking the remainder:
    /// `rotate(-30.0)` is `(hue - 30 + 360) % 360`, bit for bit. A Euclidean
    /// wrap of `hue - 30` can differ in the last bit and round a channel the
    /// other way.
    pub fn rotate(self, degrees: f64) -> Self {
        let turned = if degrees < 0.0 {
            (self.hue + degrees + 360.0) % 360.0
        } else {
            (self.hue + degrees) % 360.0
        };
        Self {
            hue: wrap_hue(turned),
            ..self
        }
    }

    pub fn to_rgb(self) -> RgbColor {
        hsv_to_rgb(self)
    }
}

/// Fold any finite angle into `[0, 360)`. Non-finite input maps to 0.
pub fn wrap_hue(hue: f64) -> f64 {
    if !hue.is_finite() {
        return 0.0;
    }
    let wrapped = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

fn unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Convert an 8-bit color to HSV with hue in degrees.
///
/// Achromatic colors (all channels equal) get hue 0 and saturation 0.
pub fn rgb_to_hsv(color: RgbColor) -> Hsv {
    let r = f64::from(color.r) / 255.0;
    let g = f64::from(color.g) / 255.0;
    let b = f64::from(color.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let saturation = if max == 0.0 { 0.0 } else { d / max };

    let sector = if d == 0.0 {
        0.0
    } else if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsv::new(sector / 6.0 * 360.0, saturation, max)
}

/// Convert HSV back to an 8-bit color.
///
/// Hue is taken modulo 360 (negative values wrap), saturation and value are
/// clamped into `[0, 1]`, and channels are rounded to the nearest integer.
pub fn hsv_to_rgb(hsv: Hsv) -> RgbColor {
    let h = wrap_hue(hsv.hue);
    let s = unit(hsv.saturation);
    let v = unit(hsv.value);

    let i = (h / 60.0).floor();
    let f = h / 60.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (i as u32) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    RgbColor::new(to_channel(r), to_channel(g), to_channel(b))
}

fn to_channel(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Format as `#RRGGBB`, upper-case and zero-padded.
pub fn rgb_to_hex(color: RgbColor) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::{FromColor, Hsv as PaletteHsv};

    fn assert_close(actual: RgbColor, expected: RgbColor, tolerance: i16) {
        let diff = |a: u8, b: u8| (i16::from(a) - i16::from(b)).abs();
        assert!(
            diff(actual.r, expected.r) <= tolerance
                && diff(actual.g, expected.g) <= tolerance
                && diff(actual.b, expected.b) <= tolerance,
            "{} not within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(rgb_to_hex(RgbColor::new(0, 0, 0)), "#000000");
        assert_eq!(rgb_to_hex(RgbColor::new(255, 255, 255)), "#FFFFFF");
        assert_eq!(rgb_to_hex(RgbColor::new(18, 52, 86)), "#123456");
        assert_eq!(RgbColor::new(0, 0, 10).to_hex(), "#00000A");
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(RgbColor::from_hex("#123456").unwrap(), RgbColor::new(18, 52, 86));
        assert_eq!(RgbColor::from_hex("ffffff").unwrap(), RgbColor::new(255, 255, 255));
        assert!(RgbColor::from_hex("#FFF").is_err());
        assert!(RgbColor::from_hex("#GGGGGG").is_err());
        assert!(RgbColor::from_hex("#12345é").is_err());
    }

    #[test]
    fn test_rgb_to_hsv_primaries() {
        assert_eq!(rgb_to_hsv(RgbColor::new(255, 0, 0)), Hsv::new(0.0, 1.0, 1.0));
        assert_eq!(rgb_to_hsv(RgbColor::new(0, 255, 0)), Hsv::new(120.0, 1.0, 1.0));
        assert_eq!(rgb_to_hsv(RgbColor::new(0, 0, 255)), Hsv::new(240.0, 1.0, 1.0));
    }

    #[test]
    fn test_rgb_to_hsv_achromatic() {
        let gray = rgb_to_hsv(RgbColor::new(128, 128, 128));
        assert_eq!(gray.hue, 0.0);
        assert_eq!(gray.saturation, 0.0);
        assert!((gray.value - 128.0 / 255.0).abs() < 1e-12);

        let black = rgb_to_hsv(RgbColor::new(0, 0, 0));
        assert_eq!(black, Hsv::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_rgb_to_hsv_magenta_side_wraps_positive() {
        // red is max and green < blue: the +6 sector fold applies
        let hsv = rgb_to_hsv(RgbColor::new(255, 0, 128));
        assert!(hsv.hue > 300.0 && hsv.hue < 360.0, "hue was {}", hsv.hue);
    }

    #[test]
    fn test_rgb_to_hsv_agrees_with_palette_crate() {
        for color in [
            RgbColor::new(200, 80, 80),
            RgbColor::new(100, 150, 200),
            RgbColor::new(12, 240, 99),
            RgbColor::new(255, 0, 128),
        ] {
            let ours = rgb_to_hsv(color);
            let srgb: Srgb<f64> = Srgb::<u8>::from(color).into_format();
            let theirs: PaletteHsv<palette::encoding::Srgb, f64> = PaletteHsv::from_color(srgb);
            assert!((ours.hue - theirs.hue.into_positive_degrees()).abs() < 1e-6);
            assert!((ours.saturation - theirs.saturation).abs() < 1e-9);
            assert!((ours.value - theirs.value).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hsv_round_trip_within_one() {
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(15) {
                for b in (0..=255u16).step_by(15) {
                    let color = RgbColor::new(r as u8, g as u8, b as u8);
                    assert_close(hsv_to_rgb(rgb_to_hsv(color)), color, 1);
                }
            }
        }
    }

    #[test]
    fn test_hsv_to_rgb_clamps_saturation_and_value() {
        for hue in [0.0, 45.0, 123.0, 359.9] {
            assert_eq!(
                hsv_to_rgb(Hsv::new(hue, 2.0, -1.0)),
                hsv_to_rgb(Hsv::new(hue, 1.0, 0.0))
            );
        }
        assert_eq!(
            hsv_to_rgb(Hsv::new(0.0, 1.0, 1.7)),
            RgbColor::new(255, 0, 0)
        );
    }

    #[test]
    fn test_hsv_to_rgb_wraps_hue() {
        let red = RgbColor::new(255, 0, 0);
        assert_eq!(hsv_to_rgb(Hsv::new(360.0, 1.0, 1.0)), red);
        assert_eq!(hsv_to_rgb(Hsv::new(720.0, 1.0, 1.0)), red);
        assert_eq!(
            hsv_to_rgb(Hsv::new(-120.0, 1.0, 1.0)),
            hsv_to_rgb(Hsv::new(240.0, 1.0, 1.0))
        );
    }

    #[test]
    fn test_hsv_to_rgb_never_propagates_nan() {
        let color = hsv_to_rgb(Hsv::new(f64::NAN, f64::NAN, f64::NAN));
        assert_eq!(color, RgbColor::new(0, 0, 0));
        let color = hsv_to_rgb(Hsv::new(f64::INFINITY, 0.0, 1.0));
        assert_eq!(color, RgbColor::new(255, 255, 255));
    }

    #[test]
    fn test_rotate_wraps_into_range() {
        let hsv = Hsv::new(350.0, 0.5, 0.5);
        assert_eq!(hsv.rotate(30.0).hue, 20.0);
        assert_eq!(Hsv::new(10.0, 0.5, 0.5).rotate(-30.0).hue, 340.0);
        assert_eq!(hsv.rotate(30.0).saturation, 0.5);
    }

    #[test]
    fn test_backward_rotate_adds_full_circle() {
        let hsv = rgb_to_hsv(RgbColor::new(0, 10, 30));
        let turned = hsv.rotate(-120.0).hue;
        assert_eq!(turned, (hsv.hue - 120.0 + 360.0) % 360.0);
        assert_ne!(turned, (hsv.hue - 120.0).rem_euclid(360.0));
        assert_eq!(hsv_to_rgb(Hsv::new(turned, 1.0, hsv.value * 1.05)), RgbColor::new(10, 32, 0));
    }

    #[test]
    fn test_serde_array_encoding() {
        let color = RgbColor::new(18, 52, 86);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "[18,52,86]");
        let back: RgbColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }

    #[test]
    fn test_display() {
        assert_eq!(RgbColor::new(1, 2, 3).to_string(), "(1, 2, 3)");
    }
}
