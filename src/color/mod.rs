//! Color representation and conversion module
//!
//! This module handles RGB/Lab conversions, lightness damping, hex
//! formatting and the representative color produced by extraction.

pub mod conversion;
pub mod representative;

pub use conversion::{ColorConverter, ColorSample, Damped, LabColor, LightnessScale, Measured};
pub use representative::RepresentativeColor;
