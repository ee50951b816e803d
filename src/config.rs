//! Configuration structures for the colorchip_season engine.
//!
//! Every numeric heuristic used by the extractors, the classifier and the
//! ranker can be overridden here. Defaults reproduce the production values
//! from [`crate::constants`].
//!
//! # Configuration Loading
//!
//! ```no_run
//! use colorchip_season::EngineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = EngineConfig::from_json_file(Path::new("engine.json"))?;
//!
//! // Or use defaults
//! let config = EngineConfig::default();
//! # Ok::<(), colorchip_season::AnalysisError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`NormalExtractionConfig`]: dominant-cluster extraction
//! - [`HardcaseExtractionConfig`]: extreme-chroma extraction and band fallback
//! - [`ClassifierConfig`]: KNN neighbor count and lightness damping
//! - [`RankerConfig`]: recommendation list length

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::ColorConverter;
use crate::constants::{clustering, classifier, damping, hardcase, normal, ranking};
use crate::error::{AnalysisError, Result};

/// Complete engine configuration.
///
/// Serializable to/from JSON so batch runs are reproducible.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Dominant-cluster extraction settings
    #[serde(default)]
    pub normal: NormalExtractionConfig,

    /// Extreme-chroma extraction settings
    #[serde(default)]
    pub hardcase: HardcaseExtractionConfig,

    /// Season classifier settings
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Recommendation ranking settings
    #[serde(default)]
    pub ranker: RankerConfig,
}

/// k-means parameters shared by both extraction strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Seed for centroid initialization
    pub seed: u64,

    /// Iteration cap
    pub max_iterations: usize,

    /// Convergence threshold
    pub convergence: f32,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            seed: clustering::SEED,
            max_iterations: clustering::MAX_ITERATIONS,
            convergence: clustering::CONVERGENCE,
        }
    }
}

/// Dominant-cluster ("Normal") extraction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalExtractionConfig {
    /// Square size the image is resized to
    pub canonical_size: u32,

    /// Central crop start as a fraction of each axis
    pub crop_start: f64,

    /// Central crop end as a fraction of each axis
    pub crop_end: f64,

    /// Brightness lower bound (exclusive)
    pub brightness_min: f64,

    /// Brightness upper bound (exclusive)
    pub brightness_max: f64,

    /// Number of clusters
    pub clusters: usize,

    /// k-means settings
    #[serde(default)]
    pub clustering: ClusteringConfig,
}

impl Default for NormalExtractionConfig {
    fn default() -> Self {
        Self {
            canonical_size: normal::CANONICAL_SIZE,
            crop_start: normal::CROP_START,
            crop_end: normal::CROP_END,
            brightness_min: normal::BRIGHTNESS_MIN,
            brightness_max: normal::BRIGHTNESS_MAX,
            clusters: normal::CLUSTERS,
            clustering: ClusteringConfig::default(),
        }
    }
}

/// Extreme-chroma ("Hardcase") extraction parameters.
///
/// The `band_*` fields drive the lower-band clustering fallback used when
/// too few pixels pass the chroma/lightness mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardcaseExtractionConfig {
    pub canonical_size: u32,

    /// Chroma lower bound (exclusive)
    pub min_chroma: f64,

    /// Lightness window (exclusive)
    pub min_lightness: f64,
    pub max_lightness: f64,

    /// Valid pixels required before falling back
    pub min_valid_pixels: usize,

    /// Fallback band start as a fraction of image height
    pub band_start: f64,

    pub band_brightness_min: f64,
    pub band_brightness_max: f64,

    pub band_clusters: usize,

    #[serde(default)]
    pub clustering: ClusteringConfig,
}

impl Default for HardcaseExtractionConfig {
    fn default() -> Self {
        Self {
            canonical_size: hardcase::CANONICAL_SIZE,
            min_chroma: hardcase::MIN_CHROMA,
            min_lightness: hardcase::MIN_LIGHTNESS,
            max_lightness: hardcase::MAX_LIGHTNESS,
            min_valid_pixels: hardcase::MIN_VALID_PIXELS,
            band_start: hardcase::BAND_START,
            band_brightness_min: hardcase::BAND_BRIGHTNESS_MIN,
            band_brightness_max: hardcase::BAND_BRIGHTNESS_MAX,
            band_clusters: hardcase::BAND_CLUSTERS,
            clustering: ClusteringConfig::default(),
        }
    }
}

/// Season classifier parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Number of nearest palette points that vote
    pub k: usize,

    /// Multiplier applied to L* of palette rows and inputs
    pub lightness_damping: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            k: classifier::DEFAULT_K,
            lightness_damping: damping::LIGHTNESS_FACTOR,
        }
    }
}

impl ClassifierConfig {
    /// Converter applying this configuration's lightness damping
    pub fn converter(&self) -> ColorConverter {
        ColorConverter::with_damping(self.lightness_damping)
    }
}

/// Recommendation ranking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Number of ranked candidates returned
    pub top_n: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            top_n: ranking::DEFAULT_TOP_N,
        }
    }
}

impl EngineConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("Failed to read {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| AnalysisError::config("Failed to parse configuration", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }

    /// Reject settings no extractor or classifier can run with
    pub fn validate(&self) -> Result<()> {
        let fraction = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(AnalysisError::invalid_input(name, v))
            }
        };
        fraction("normal.crop_start", self.normal.crop_start)?;
        fraction("normal.crop_end", self.normal.crop_end)?;
        fraction("hardcase.band_start", self.hardcase.band_start)?;

        if self.normal.crop_start >= self.normal.crop_end {
            return Err(AnalysisError::invalid_input(
                "normal.crop_end",
                self.normal.crop_end,
            ));
        }
        if self.normal.canonical_size == 0 {
            return Err(AnalysisError::invalid_input("normal.canonical_size", 0));
        }
        if self.hardcase.canonical_size == 0 {
            return Err(AnalysisError::invalid_input("hardcase.canonical_size", 0));
        }
        if self.normal.clusters == 0 || self.normal.clusters > u8::MAX as usize {
            return Err(AnalysisError::invalid_input(
                "normal.clusters",
                self.normal.clusters,
            ));
        }
        if self.hardcase.band_clusters == 0 || self.hardcase.band_clusters > u8::MAX as usize {
            return Err(AnalysisError::invalid_input(
                "hardcase.band_clusters",
                self.hardcase.band_clusters,
            ));
        }
        if self.classifier.k == 0 {
            return Err(AnalysisError::invalid_input("classifier.k", 0));
        }
        let damping = self.classifier.lightness_damping;
        if !damping.is_finite() || damping <= 0.0 {
            return Err(AnalysisError::invalid_input("classifier.lightness_damping", damping));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.normal.canonical_size, 160);
        assert_eq!(config.normal.clusters, 4);
        assert_eq!(config.hardcase.canonical_size, 200);
        assert_eq!(config.hardcase.min_valid_pixels, 10);
        assert_eq!(config.hardcase.band_clusters, 3);
        assert_eq!(config.classifier.k, 7);
        assert_eq!(config.classifier.lightness_damping, 0.3);
        assert_eq!(config.ranker.top_n, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed = EngineConfig::from_json_str(r#"{"ranker": {"top_n": 3}}"#).unwrap();
        assert_eq!(parsed.ranker.top_n, 3);
        assert_eq!(parsed.classifier.k, 7);
        assert_eq!(parsed.normal, NormalExtractionConfig::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.classifier.k = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.normal.crop_start = 0.8;
        assert!(config.validate().is_err());

        assert!(EngineConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "colorchip_season_config_{}.json",
            std::process::id()
        ));
        let mut config = EngineConfig::default();
        config.classifier.k = 5;
        config.to_json_file(&path).unwrap();
        let loaded = EngineConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.classifier.k, 5);
    }
}
