//! Extraction thresholds, classifier defaults and reference values
//!
//! Compile-time constants grouped by the component that consumes them.
//! The values are the tuned production heuristics; [`crate::config`] exposes
//! the same numbers as overridable defaults.

/// Lightness damping applied to every Lab value used for season classification
pub mod damping {
    /// Multiplier on L* that suppresses illumination sensitivity
    pub const LIGHTNESS_FACTOR: f64 = 0.3;
}

/// Perceptual brightness weights (ITU-R BT.601 luma)
pub mod brightness {
    pub const RED_WEIGHT: f64 = 0.299;
    pub const GREEN_WEIGHT: f64 = 0.587;
    pub const BLUE_WEIGHT: f64 = 0.114;
}

/// Dominant-cluster ("Normal") extraction parameters
pub mod normal {
    /// Canonical square size every input is resized to
    pub const CANONICAL_SIZE: u32 = 160;

    /// Central crop bounds as fractions of each axis
    pub const CROP_START: f64 = 0.25;
    pub const CROP_END: f64 = 0.75;

    /// Mid-brightness mask, exclusive on both ends
    pub const BRIGHTNESS_MIN: f64 = 30.0;
    pub const BRIGHTNESS_MAX: f64 = 230.0;

    /// Number of k-means clusters
    pub const CLUSTERS: usize = 4;
}

/// Extreme-chroma ("Hardcase") extraction parameters
pub mod hardcase {
    /// Canonical square size every input is resized to
    pub const CANONICAL_SIZE: u32 = 200;

    /// Minimum chroma, exclusive
    pub const MIN_CHROMA: f64 = 25.0;

    /// Lightness window, exclusive on both ends
    pub const MIN_LIGHTNESS: f64 = 15.0;
    pub const MAX_LIGHTNESS: f64 = 90.0;

    /// Below this many valid pixels the band fallback is used
    pub const MIN_VALID_PIXELS: usize = 10;

    /// Fallback band starts at this fraction of the image height
    pub const BAND_START: f64 = 0.7;

    /// Fallback brightness mask, exclusive on both ends
    pub const BAND_BRIGHTNESS_MIN: f64 = 10.0;
    pub const BAND_BRIGHTNESS_MAX: f64 = 200.0;

    /// Number of k-means clusters in the fallback band
    pub const BAND_CLUSTERS: usize = 3;
}

/// k-means settings shared by both extractors
pub mod clustering {
    /// Fixed seed for reproducible centroid initialization
    pub const SEED: u64 = 42;

    /// Iteration cap per run
    pub const MAX_ITERATIONS: usize = 300;

    /// Convergence threshold on the centroid score
    pub const CONVERGENCE: f32 = 1e-5;
}

/// Neutral-gray color returned whenever extraction cannot complete
pub mod fallback {
    pub const RGB: [u8; 3] = [120, 120, 120];
    pub const LAB: [f64; 3] = [20.0, 0.0, 0.0];
    pub const HEX: &str = "#777777";
}

/// Rounding applied to stored Lab coordinates
pub mod rounding {
    /// Decimal places kept on L*, a*, b*
    pub const LAB_DECIMALS: i32 = 4;
}

/// Season classifier parameters
pub mod classifier {
    /// Default neighbor count
    pub const DEFAULT_K: usize = 7;

    /// Epsilon added to distances in the full-palette affinity score
    pub const AFFINITY_EPSILON: f64 = 1e-6;

    /// Share of the eye color blended into skin a*/b*
    pub const EYE_BLEND: f64 = 0.05;

    /// Lightness micro-correction for very dark and very light skin
    pub const DARK_SKIN_L: f64 = 40.0;
    pub const DARK_SKIN_GAIN: f64 = 1.03;
    pub const LIGHT_SKIN_L: f64 = 70.0;
    pub const LIGHT_SKIN_GAIN: f64 = 0.97;
}

/// Recommendation ranking parameters
pub mod ranking {
    /// Number of candidates returned
    pub const DEFAULT_TOP_N: usize = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_weights_sum_to_one() {
        let sum = brightness::RED_WEIGHT + brightness::GREEN_WEIGHT + brightness::BLUE_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_ranges() {
        assert!(normal::CROP_START < normal::CROP_END);
        assert!(normal::BRIGHTNESS_MIN < normal::BRIGHTNESS_MAX);
        assert!(hardcase::MIN_LIGHTNESS < hardcase::MAX_LIGHTNESS);
        assert!(hardcase::BAND_BRIGHTNESS_MIN < hardcase::BAND_BRIGHTNESS_MAX);
        assert!(hardcase::BAND_START > 0.0 && hardcase::BAND_START < 1.0);
    }

    #[test]
    fn test_fallback_hex_is_fixed() {
        // the stored hex is a fixed sentinel, not derived from RGB
        assert_eq!(fallback::HEX, "#777777");
        assert_eq!(fallback::RGB, [120, 120, 120]);
    }
}
