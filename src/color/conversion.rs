//! Color space conversion utilities
//!
//! Provides the conversions every other component builds on:
//! - 8-bit RGB samples to CIE Lab (sRGB primaries, D65 white)
//! - Lab back to 8-bit RGB with gamut clamping
//! - Lightness damping for season classification
//! - Hex color representation
//!
//! Lab values carry a type-level marker saying whether L* has been damped.
//! [`Measured`] colors come straight from the conversion; [`Damped`] colors
//! have L* multiplied by the damping factor. Distance is only defined between
//! two colors with the same marker, so a damped classifier input can never be
//! compared against an undamped catalog color.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use palette::{white_point::D65, FromColor, Lab, Srgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{brightness, damping};
use crate::{AnalysisError, Result};

/// An 8-bit sRGB color sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct ColorSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSample {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Perceptual brightness `0.299 R + 0.587 G + 0.114 B`, in [0, 255]
    pub fn brightness(self) -> f64 {
        brightness::RED_WEIGHT * f64::from(self.r)
            + brightness::GREEN_WEIGHT * f64::from(self.g)
            + brightness::BLUE_WEIGHT * f64::from(self.b)
    }

    /// Uppercase `#RRGGBB` representation
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse a hexadecimal color string
    ///
    /// # Arguments
    ///
    /// * `hex` - Hex color string (e.g., "#FF0000" or "FF0000")
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidHex` if the string is not six hex digits
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(AnalysisError::InvalidHex {
                value: hex.to_string(),
                reason: format!("expected 6 hex digits, got {}", digits.chars().count()),
            });
        }
        // from_str_radix tolerates a leading sign
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(AnalysisError::InvalidHex {
                value: hex.to_string(),
                reason: format!("'{}' is not a hex digit", bad),
            });
        }

        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&digits[range], 16).map_err(|e| AnalysisError::InvalidHex {
                value: hex.to_string(),
                reason: format!("invalid {} value: {}", name, e),
            })
        };

        Ok(Self::new(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// Round and clamp floating-point channels in the 0–255 range
    pub fn from_f64_channels(r: f64, g: f64, b: f64) -> Self {
        let quantize = |v: f64| {
            if v.is_nan() {
                0
            } else {
                v.round().clamp(0.0, 255.0) as u8
            }
        };
        Self::new(quantize(r), quantize(g), quantize(b))
    }
}

impl From<[u8; 3]> for ColorSample {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<ColorSample> for [u8; 3] {
    fn from(sample: ColorSample) -> Self {
        sample.to_array()
    }
}

impl From<image::Rgb<u8>> for ColorSample {
    fn from(pixel: image::Rgb<u8>) -> Self {
        let [r, g, b] = pixel.0;
        Self::new(r, g, b)
    }
}

impl FromStr for ColorSample {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for ColorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Marker for how the L* channel of a [`LabColor`] is scaled
pub trait LightnessScale:
    fmt::Debug + Clone + Copy + PartialEq + Default + Send + Sync + 'static
{
}

/// Plain CIE L* as produced by the RGB to Lab conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Measured;

/// L* multiplied by the classification damping factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Damped;

impl LightnessScale for Measured {}

impl LightnessScale for Damped {}

/// CIE Lab coordinates tagged with their lightness scale
///
/// Serialized as a bare `[L, a, b]` array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabColor<S: LightnessScale = Measured> {
    l: f64,
    a: f64,
    b: f64,
    scale: PhantomData<S>,
}

impl<S: LightnessScale> LabColor<S> {
    fn from_parts(l: f64, a: f64, b: f64) -> Self {
        Self {
            l,
            a,
            b,
            scale: PhantomData,
        }
    }

    pub fn l(&self) -> f64 {
        self.l
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.l, self.a, self.b]
    }

    /// Colorfulness `sqrt(a² + b²)`; independent of lightness scaling
    pub fn chroma(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Euclidean distance (ΔE76) to another color of the same scale
    pub fn distance(&self, other: &Self) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.l.is_finite() && self.a.is_finite() && self.b.is_finite()
    }

    /// Round every coordinate to `decimals` places
    pub fn rounded(&self, decimals: i32) -> Self {
        let scale = 10f64.powi(decimals);
        let round = |v: f64| (v * scale).round() / scale;
        Self::from_parts(round(self.l), round(self.a), round(self.b))
    }
}

impl LabColor<Measured> {
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self::from_parts(l, a, b)
    }

    /// Build from a caller-supplied slice, checking arity and finiteness
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the slice does not hold
    /// exactly three finite values
    pub fn try_from_slice(values: &[f64]) -> Result<Self> {
        let [l, a, b] = <[f64; 3]>::try_from(values)
            .map_err(|_| AnalysisError::invalid_input("lab.len", values.len()))?;
        let lab = Self::new(l, a, b);
        if !lab.is_finite() {
            return Err(AnalysisError::invalid_input("lab", format!("{:?}", values)));
        }
        Ok(lab)
    }

    /// Multiply L* by `factor`, leaving a* and b* unchanged
    pub fn damp(self, factor: f64) -> LabColor<Damped> {
        LabColor::from_parts(self.l * factor, self.a, self.b)
    }
}

impl LabColor<Damped> {
    /// Wrap coordinates whose L* has already been damped (stored values)
    pub fn from_damped(l: f64, a: f64, b: f64) -> Self {
        Self::from_parts(l, a, b)
    }
}

impl TryFrom<&[f64]> for LabColor<Measured> {
    type Error = AnalysisError;

    fn try_from(values: &[f64]) -> Result<Self> {
        Self::try_from_slice(values)
    }
}

impl<S: LightnessScale> Serialize for LabColor<S> {
    fn serialize<Ser: Serializer>(
        &self,
        serializer: Ser,
    ) -> std::result::Result<Ser::Ok, Ser::Error> {
        self.to_array().serialize(serializer)
    }
}

impl<'de, S: LightnessScale> Deserialize<'de> for LabColor<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let [l, a, b] = <[f64; 3]>::deserialize(deserializer)?;
        Ok(Self::from_parts(l, a, b))
    }
}

/// Color converter with a configurable lightness damping factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorConverter {
    lightness_damping: f64,
}

impl Default for ColorConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorConverter {
    /// Create a converter with the standard damping factor (0.3)
    pub fn new() -> Self {
        Self {
            lightness_damping: damping::LIGHTNESS_FACTOR,
        }
    }

    pub fn with_damping(lightness_damping: f64) -> Self {
        Self { lightness_damping }
    }

    pub fn lightness_damping(&self) -> f64 {
        self.lightness_damping
    }

    /// Convert an 8-bit RGB sample to Lab (D65)
    ///
    /// # Arguments
    ///
    /// * `sample` - sRGB color with channels in [0, 255]
    ///
    /// # Returns
    ///
    /// Undamped Lab color
    pub fn rgb_to_lab(&self, sample: ColorSample) -> LabColor<Measured> {
        let srgb = Srgb::new(sample.r, sample.g, sample.b).into_format::<f64>();
        let lab: Lab<D65, f64> = Lab::from_color(srgb);
        LabColor::new(lab.l, lab.a, lab.b)
    }

    /// Convert unquantized RGB channels in [0, 255] (e.g. a cluster centroid)
    pub fn channels_to_lab(&self, [r, g, b]: [f64; 3]) -> LabColor<Measured> {
        let srgb = Srgb::new(r / 255.0, g / 255.0, b / 255.0);
        let lab: Lab<D65, f64> = Lab::from_color(srgb);
        LabColor::new(lab.l, lab.a, lab.b)
    }

    /// Convert Lab back to the nearest 8-bit sRGB sample, clamped to gamut
    pub fn lab_to_rgb(&self, lab: LabColor<Measured>) -> ColorSample {
        let srgb: Srgb<f64> = Srgb::from_color(Lab::<D65, f64>::new(lab.l, lab.a, lab.b));
        ColorSample::from_f64_channels(srgb.red * 255.0, srgb.green * 255.0, srgb.blue * 255.0)
    }

    /// Apply this converter's damping factor to L*
    pub fn damp_lightness(&self, lab: LabColor<Measured>) -> LabColor<Damped> {
        lab.damp(self.lightness_damping)
    }

    /// RGB straight to the damped Lab used for classification and storage
    pub fn rgb_to_damped_lab(&self, sample: ColorSample) -> LabColor<Damped> {
        self.damp_lightness(self.rgb_to_lab(sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_lab_black() {
        let converter = ColorConverter::new();
        let lab = converter.rgb_to_lab(ColorSample::new(0, 0, 0));
        assert!(lab.l() < 1.0);
    }

    #[test]
    fn test_rgb_to_lab_white() {
        let converter = ColorConverter::new();
        let lab = converter.rgb_to_lab(ColorSample::new(255, 255, 255));
        assert!(lab.l() > 99.0);
        assert!(lab.a().abs() < 1.0);
        assert!(lab.b().abs() < 1.0);
    }

    #[test]
    fn test_rgb_to_lab_pure_red() {
        // reference values for sRGB red under D65
        let lab = ColorConverter::new().rgb_to_lab(ColorSample::new(255, 0, 0));
        assert!((lab.l() - 53.24).abs() < 0.1);
        assert!((lab.a() - 80.09).abs() < 0.2);
        assert!((lab.b() - 67.20).abs() < 0.2);
    }

    #[test]
    fn test_damping_only_touches_lightness() {
        let converter = ColorConverter::new();
        let lab = LabColor::new(60.0, 12.5, -7.25);
        let damped = converter.damp_lightness(lab);
        assert!((damped.l() - 18.0).abs() < 1e-12);
        assert_eq!(damped.a(), 12.5);
        assert_eq!(damped.b(), -7.25);
    }

    #[test]
    fn test_lab_rgb_roundtrip() {
        let converter = ColorConverter::new();
        for sample in [
            ColorSample::new(200, 30, 70),
            ColorSample::new(17, 140, 220),
            ColorSample::new(128, 128, 128),
        ] {
            let back = converter.lab_to_rgb(converter.rgb_to_lab(sample));
            assert_eq!(back, sample);
        }
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(ColorSample::new(255, 0, 0).to_hex(), "#FF0000");
        assert_eq!(ColorSample::new(0, 255, 0).to_hex(), "#00FF00");
        assert_eq!(ColorSample::new(0x78, 0x3C, 0x50).to_hex(), "#783C50");
    }

    #[test]
    fn test_hex_roundtrip_all_channels() {
        for v in 0..=255u8 {
            let sample = ColorSample::new(v, 255 - v, v.wrapping_mul(7));
            assert_eq!(ColorSample::from_hex(&sample.to_hex()).unwrap(), sample);
        }
    }

    #[test]
    fn test_hex_without_hash_and_lowercase() {
        assert_eq!(ColorSample::from_hex("00ff7f").unwrap(), ColorSample::new(0, 255, 127));
        assert_eq!("#0A0B0C".parse::<ColorSample>().unwrap(), ColorSample::new(10, 11, 12));
    }

    #[test]
    fn test_hex_invalid() {
        assert!(ColorSample::from_hex("#FF").is_err());
        assert!(ColorSample::from_hex("#GGGGGG").is_err());
        assert!(ColorSample::from_hex("#ÀÀÀ").is_err());
    }

    #[test]
    fn test_hex_rejects_sign_characters() {
        for input in ["#+F+F+F", "+FF+FF", "#-1-2-3", "00+0FF"] {
            match ColorSample::from_hex(input) {
                Err(AnalysisError::InvalidHex { value, .. }) => assert_eq!(value, input),
                other => panic!("expected InvalidHex for {}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_brightness() {
        assert_eq!(ColorSample::new(0, 0, 0).brightness(), 0.0);
        assert!((ColorSample::new(255, 255, 255).brightness() - 255.0).abs() < 1e-9);
        assert!((ColorSample::new(100, 0, 0).brightness() - 29.9).abs() < 1e-9);
    }

    #[test]
    fn test_from_f64_channels_rounds_and_clamps() {
        assert_eq!(
            ColorSample::from_f64_channels(12.5, -3.0, 300.0),
            ColorSample::new(13, 0, 255)
        );
    }

    #[test]
    fn test_distance_and_chroma() {
        let a = LabColor::new(50.0, 0.0, 0.0);
        let b = LabColor::new(50.0, 3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((b.chroma() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_try_from_slice_validation() {
        assert!(LabColor::try_from_slice(&[50.0, 1.0, 2.0]).is_ok());
        assert!(matches!(
            LabColor::try_from_slice(&[50.0, 1.0]),
            Err(AnalysisError::InvalidInput { .. })
        ));
        assert!(matches!(
            LabColor::try_from_slice(&[f64::NAN, 1.0, 2.0]),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_rounding() {
        let lab = LabColor::new(12.345_678, -0.000_04, 99.999_96).rounded(4);
        assert_eq!(lab.to_array(), [12.3457, -0.0, 100.0]);
    }

    #[test]
    fn test_serde_shapes() {
        let sample = ColorSample::new(1, 2, 3);
        assert_eq!(serde_json::to_string(&sample).unwrap(), "[1,2,3]");
        let lab = LabColor::from_damped(20.0, 0.5, -1.0);
        assert_eq!(serde_json::to_string(&lab).unwrap(), "[20.0,0.5,-1.0]");
        let back: LabColor<Damped> = serde_json::from_str("[20.0,0.5,-1.0]").unwrap();
        assert_eq!(back, lab);
    }
}
