//! Representative color extraction
//!
//! Two strategies reduce a product image to one [`RepresentativeColor`]:
//! - [`DominantColorExtractor`]: largest k-means cluster of the central crop
//! - [`ExtremeChromaExtractor`]: single most saturated pixel, with a
//!   lower-band clustering fallback
//!
//! Extraction never fails past this boundary. Every strategy reports an
//! [`ExtractionOutcome`]; hard failures are logged and resolved to the fixed
//! neutral gray.

pub mod cluster;
pub mod frame;
pub mod hardcase;
pub mod normal;

pub use hardcase::ExtremeChromaExtractor;
pub use normal::DominantColorExtractor;

use image::RgbImage;
use log::{debug, warn};

use crate::color::RepresentativeColor;
use crate::AnalysisError;

/// Result of one extraction attempt
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// A representative color was found
    Success(RepresentativeColor),
    /// Too few qualifying pixels for the primary procedure; not an anomaly
    InsufficientSignal { valid_pixels: usize, required: usize },
    /// The input or pixel population could not be processed
    HardFailure(AnalysisError),
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionOutcome::Success(_))
    }

    /// Collapse to a color, substituting the neutral gray for anything but success
    ///
    /// `strategy` and `source` identify the attempt in the log.
    pub fn resolve(self, strategy: &str, source: &str) -> RepresentativeColor {
        match self {
            ExtractionOutcome::Success(color) => {
                debug!(
                    "[{}] {} -> rgb={:?} lab={:?} hex={}",
                    strategy,
                    source,
                    color.rgb.to_array(),
                    color.lab.to_array(),
                    color.hex
                );
                color
            }
            ExtractionOutcome::InsufficientSignal {
                valid_pixels,
                required,
            } => {
                debug!(
                    "[{}] {}: {} qualifying pixels (need {}), using neutral fallback",
                    strategy, source, valid_pixels, required
                );
                RepresentativeColor::neutral_fallback()
            }
            ExtractionOutcome::HardFailure(err) => {
                warn!(
                    "[{}] extraction failed for {}: {}; using neutral fallback",
                    strategy, source, err
                );
                RepresentativeColor::neutral_fallback()
            }
        }
    }
}

/// A strategy that reduces an RGB image to one representative color
pub trait ColorExtractor: Send + Sync {
    /// Short strategy name used in log lines
    fn name(&self) -> &'static str;

    /// Run the strategy, reporting how it ended
    fn try_extract(&self, image: &RgbImage) -> ExtractionOutcome;

    /// Run the strategy; failures degrade to the logged neutral gray
    fn extract(&self, source: &str, image: &RgbImage) -> RepresentativeColor {
        self.try_extract(image).resolve(self.name(), source)
    }

    /// Extract from a raw interleaved RGB buffer
    fn extract_raw(
        &self,
        source: &str,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> RepresentativeColor {
        match frame::frame_from_raw(width, height, data) {
            Ok(image) => self.extract(source, &image),
            Err(err) => ExtractionOutcome::HardFailure(err).resolve(self.name(), source),
        }
    }

    /// Decode encoded image bytes (PNG, JPEG) and extract
    fn extract_encoded(&self, source: &str, bytes: &[u8]) -> RepresentativeColor {
        match frame::decode(bytes) {
            Ok(image) => self.extract(source, &image),
            Err(err) => ExtractionOutcome::HardFailure(err).resolve(self.name(), source),
        }
    }
}
