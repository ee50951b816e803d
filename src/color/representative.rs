//! The canonical color assigned to one product image

use serde::{Deserialize, Serialize};

use crate::color::{ColorConverter, ColorSample, Damped, LabColor};
use crate::constants::{fallback, rounding};

/// Representative color of a product image
///
/// Serialized as `{"rgb": [r, g, b], "lab": [L, a, b], "hex": "#RRGGBB"}`.
/// The Lab coordinates carry the classification damping on L* and are
/// rounded to four decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepresentativeColor {
    /// sRGB color in [0, 255]
    pub rgb: ColorSample,
    /// Damped CIE Lab coordinates
    pub lab: LabColor<Damped>,
    /// Uppercase hexadecimal representation
    pub hex: String,
}

impl RepresentativeColor {
    /// Derive Lab and hex from a chosen RGB value
    pub fn from_rgb(rgb: ColorSample, converter: &ColorConverter) -> Self {
        let lab = converter
            .rgb_to_damped_lab(rgb)
            .rounded(rounding::LAB_DECIMALS);
        Self {
            rgb,
            lab,
            hex: rgb.to_hex(),
        }
    }

    /// Fixed neutral gray used whenever extraction cannot complete
    pub fn neutral_fallback() -> Self {
        let [l, a, b] = fallback::LAB;
        Self {
            rgb: ColorSample::from(fallback::RGB),
            lab: LabColor::from_damped(l, a, b),
            hex: fallback::HEX.to_string(),
        }
    }

    pub fn is_neutral_fallback(&self) -> bool {
        *self == Self::neutral_fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb_damps_and_rounds() {
        let converter = ColorConverter::new();
        let color = RepresentativeColor::from_rgb(ColorSample::new(255, 255, 255), &converter);
        assert_eq!(color.hex, "#FFFFFF");
        // white has L* = 100, damped to 30
        assert!((color.lab.l() - 30.0).abs() < 1e-3);
        let scaled = color.lab.l() * 10_000.0;
        assert!((scaled - scaled.round()).abs() < 1e-6);
    }

    #[test]
    fn test_neutral_fallback_is_fixed() {
        let fallback = RepresentativeColor::neutral_fallback();
        assert_eq!(fallback.rgb, ColorSample::new(120, 120, 120));
        assert_eq!(fallback.lab.to_array(), [20.0, 0.0, 0.0]);
        assert_eq!(fallback.hex, "#777777");
        assert!(fallback.is_neutral_fallback());
        assert_eq!(fallback, RepresentativeColor::neutral_fallback());
    }

    #[test]
    fn test_serialization_shape() {
        let color = RepresentativeColor::neutral_fallback();
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, r##"{"rgb":[120,120,120],"lab":[20.0,0.0,0.0],"hex":"#777777"}"##);

        let back: RepresentativeColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }
}
