//! Dominant-cluster ("Normal") color extraction
//!
//! Reduces the central, mid-brightness pixel population of a product photo
//! to the centroid of its largest k-means cluster:
//! 1. Resize to the canonical square (160×160)
//! 2. Crop the inner 25 %–75 % window on both axes
//! 3. Keep pixels with 30 < brightness < 230 (whole crop if none survive)
//! 4. Partition into 4 clusters with a fixed seed
//! 5. Take the largest cluster's centroid, rounded and clamped

use image::RgbImage;

use super::cluster::{largest_cluster, PixelClusterer};
use super::{frame, ColorExtractor, ExtractionOutcome};
use crate::color::{ColorConverter, ColorSample, RepresentativeColor};
use crate::config::NormalExtractionConfig;
use crate::{AnalysisError, Result};

/// Largest-cluster extractor over the central crop
#[derive(Debug, Clone)]
pub struct DominantColorExtractor {
    config: NormalExtractionConfig,
    converter: ColorConverter,
    clusterer: PixelClusterer,
}

impl Default for DominantColorExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DominantColorExtractor {
    /// Create an extractor with the production parameters
    pub fn new() -> Self {
        Self::with_config(NormalExtractionConfig::default(), ColorConverter::new())
    }

    pub fn with_config(config: NormalExtractionConfig, converter: ColorConverter) -> Self {
        let clusterer = PixelClusterer::new(config.clusters, config.clustering);
        Self {
            config,
            converter,
            clusterer,
        }
    }

    pub fn config(&self) -> &NormalExtractionConfig {
        &self.config
    }

    /// Compute the dominant RGB value of `image`
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError` if the image is empty, the crop window holds no
    /// pixels, or clustering fails
    pub fn dominant_rgb(&self, image: &RgbImage) -> Result<ColorSample> {
        let canonical = frame::to_canonical(image, self.config.canonical_size)?;

        let crop = frame::crop_pixels(&canonical, self.config.crop_start, self.config.crop_end);
        if crop.is_empty() {
            return Err(AnalysisError::degenerate(
                "normal/crop",
                "central crop window is empty",
            ));
        }

        let selection =
            frame::brightness_window(crop, self.config.brightness_min, self.config.brightness_max);
        if !selection.masked {
            log::debug!("[normal] brightness mask rejected every pixel, using unfiltered crop");
        }

        let clusters = self.clusterer.cluster(&selection.pixels)?;
        let best = largest_cluster(&clusters).ok_or_else(|| AnalysisError::ClusteringError {
            reason: "clustering returned no clusters".into(),
        })?;

        Ok(best.centroid_sample())
    }
}

impl ColorExtractor for DominantColorExtractor {
    fn name(&self) -> &'static str {
        "normal"
    }

    fn try_extract(&self, image: &RgbImage) -> ExtractionOutcome {
        match self.dominant_rgb(image) {
            Ok(rgb) => {
                ExtractionOutcome::Success(RepresentativeColor::from_rgb(rgb, &self.converter))
            }
            Err(err) => ExtractionOutcome::HardFailure(err),
        }
    }
}
