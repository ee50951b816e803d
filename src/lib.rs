//! # Colorchip Season
//!
//! Color fingerprinting for cosmetic product photos and personal-color
//! season matching.
//!
//! This library provides:
//! - Two representative-color extractors (dominant cluster, extreme chroma)
//! - Per-product reconciliation of repeated extractions
//! - A distance-weighted KNN season classifier over a Lab palette
//! - Ranking of catalog colors against a classified skin color
//!
//! ## Example
//!
//! ```rust,no_run
//! use colorchip_season::{ColorExtractor, DominantColorExtractor};
//!
//! let bytes = std::fs::read("lipstick.jpg")?;
//! let color = DominantColorExtractor::new().extract_encoded("lipstick.jpg", &bytes);
//! println!("RGB: {:?}, Lab: {:?}, Hex: {}", color.rgb, color.lab, color.hex);
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod catalog;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod extraction;
pub mod recommend;
pub mod season;

pub use catalog::{
    BatchItem, BatchProcessor, BatchSummary, CaseType, CatalogRow, ProductKey, ProductRecord,
    RecordTable,
};
pub use color::{ColorConverter, ColorSample, Damped, LabColor, Measured, RepresentativeColor};
pub use config::EngineConfig;
pub use error::{AnalysisError, Result};
pub use extraction::{
    ColorExtractor, DominantColorExtractor, ExtractionOutcome, ExtremeChromaExtractor,
};
pub use recommend::{Candidate, Recommendation, RecommendationRanker, SeasonScope};
pub use season::{ClassificationResult, Season, SeasonClassifier, SeasonInput, SeasonPalette};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representative_color_serialization() {
        let converter = ColorConverter::new();
        let color = RepresentativeColor::from_rgb(ColorSample::new(51, 102, 204), &converter);

        let json = serde_json::to_string(&color).unwrap();
        let deserialized: RepresentativeColor = serde_json::from_str(&json).unwrap();

        assert_eq!(color, deserialized);
        assert_eq!(deserialized.hex, "#3366CC");
    }
}
