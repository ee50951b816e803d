//! Most-saturated-pixel ("Hardcase") color extraction
//!
//! Thin pigment streaks get averaged away by clustering, so this strategy
//! keeps the single most chromatic pixel instead. Images with too few
//! chromatic pixels go through a lower-band clustering fallback.

use image::RgbImage;
use log::debug;

use super::cluster::PixelClusterer;
use super::{frame, ColorExtractor, ExtractionOutcome};
use crate::color::{ColorConverter, ColorSample, RepresentativeColor};
use crate::config::HardcaseExtractionConfig;
use crate::{AnalysisError, Result};

/// Single-pixel extreme-chroma extractor
#[derive(Debug, Clone)]
pub struct ExtremeChromaExtractor {
    config: HardcaseExtractionConfig,
    converter: ColorConverter,
    band_clusterer: PixelClusterer,
}

impl Default for ExtremeChromaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtremeChromaExtractor {
    pub fn new() -> Self {
        Self::with_config(HardcaseExtractionConfig::default(), ColorConverter::new())
    }

    pub fn with_config(config: HardcaseExtractionConfig, converter: ColorConverter) -> Self {
        let band_clusterer = PixelClusterer::new(config.band_clusters, config.clustering);
        Self {
            config,
            converter,
            band_clusterer,
        }
    }

    pub fn config(&self) -> &HardcaseExtractionConfig {
        &self.config
    }

    /// Primary procedure on an already canonical image
    ///
    /// Scans row-major; a later pixel replaces the current best only with
    /// strictly greater chroma.
    pub fn most_saturated(&self, canonical: &RgbImage) -> ExtractionOutcome {
        let scored: Vec<(ColorSample, f64)> = canonical
            .pixels()
            .map(|pixel| {
                let sample = ColorSample::from(*pixel);
                let lab = self.converter.rgb_to_lab(sample);
                (sample, lab)
            })
            .filter(|(_, lab)| self.is_valid(lab.l(), lab.chroma()))
            .map(|(sample, lab)| (sample, lab.chroma()))
            .collect();
        let valid = scored.len();

        if valid < self.config.min_valid_pixels {
            return ExtractionOutcome::InsufficientSignal {
                valid_pixels: valid,
                required: self.config.min_valid_pixels,
            };
        }

        match strongest(scored) {
            Some(sample) => {
                ExtractionOutcome::Success(RepresentativeColor::from_rgb(sample, &self.converter))
            }
            // min_valid_pixels of 0 on an image with no valid pixel
            None => ExtractionOutcome::HardFailure(AnalysisError::degenerate(
                "hardcase/scan",
                "no pixel passed the chroma and lightness mask",
            )),
        }
    }

    /// Fallback: cluster the lower band and keep the most chromatic centroid
    ///
    /// Centroid ties keep the earlier cluster.
    pub fn band_fallback(&self, canonical: &RgbImage) -> Result<ColorSample> {
        let band = frame::band_pixels(canonical, self.config.band_start);
        if band.is_empty() {
            return Err(AnalysisError::degenerate(
                "hardcase/band",
                "lower band holds no pixels",
            ));
        }

        let selection = frame::brightness_window(
            band,
            self.config.band_brightness_min,
            self.config.band_brightness_max,
        );
        let clusters = self.band_clusterer.cluster(&selection.pixels)?;

        let best = strongest(clusters.iter().map(|cluster| {
            let lab = self.converter.channels_to_lab(cluster.centroid);
            (cluster.centroid, lab.a() * lab.a() + lab.b() * lab.b())
        }));

        best.map(|[r, g, b]| ColorSample::from_f64_channels(r, g, b))
            .ok_or_else(|| AnalysisError::ClusteringError {
                reason: "band clustering returned no clusters".into(),
            })
    }

    fn is_valid(&self, lightness: f64, chroma: f64) -> bool {
        chroma > self.config.min_chroma
            && lightness > self.config.min_lightness
            && lightness < self.config.max_lightness
    }
}

/// Item with the highest score; a later item wins only with a strictly greater score
fn strongest<T>(scored: impl IntoIterator<Item = (T, f64)>) -> Option<T> {
    let mut best: Option<(T, f64)> = None;
    for (item, score) in scored {
        match &best {
            Some((_, top)) if score <= *top => {}
            _ => best = Some((item, score)),
        }
    }
    best.map(|(item, _)| item)
}

impl ColorExtractor for ExtremeChromaExtractor {
    fn name(&self) -> &'static str {
        "hardcase"
    }

    fn try_extract(&self, image: &RgbImage) -> ExtractionOutcome {
        let canonical = match frame::to_canonical(image, self.config.canonical_size) {
            Ok(img) => img,
            Err(err) => return ExtractionOutcome::HardFailure(err),
        };

        match self.most_saturated(&canonical) {
            ExtractionOutcome::InsufficientSignal {
                valid_pixels,
                required,
            } => {
                debug!(
                    "[hardcase] {} chromatic pixels (need {}), clustering lower band",
                    valid_pixels, required
                );
                match self.band_fallback(&canonical) {
                    Ok(rgb) => ExtractionOutcome::Success(RepresentativeColor::from_rgb(
                        rgb,
                        &self.converter,
                    )),
                    Err(err) => ExtractionOutcome::HardFailure(err),
                }
            }
            outcome => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const GRAY: Rgb<u8> = Rgb([128, 128, 128]);

    #[test]
    fn test_most_saturated_pixel_wins() {
        let mut img = RgbImage::from_pixel(200, 200, GRAY);
        for i in 0..11 {
            img.put_pixel(20 + i, 30, Rgb([200, 60, 60]));
        }
        img.put_pixel(150, 170, Rgb([230, 0, 40]));

        let color = ExtremeChromaExtractor::new().extract("streak", &img);
        assert_eq!(color.rgb, ColorSample::new(230, 0, 40));
        assert_eq!(color.hex, "#E60028");
    }

    #[test]
    fn test_strongest_keeps_first_on_equal_score() {
        let scored = vec![("dull", 3.0), ("first", 9.0), ("second", 9.0), ("low", 8.5)];
        assert_eq!(strongest(scored), Some("first"));
        assert_eq!(strongest(vec![("late", 1.0), ("later", 2.0)]), Some("later"));
        assert_eq!(strongest(Vec::<(u8, f64)>::new()), None);
    }

    #[test]
    fn test_min_valid_pixel_count_is_inclusive() {
        let extractor = ExtremeChromaExtractor::new();
        let mut img = RgbImage::from_pixel(200, 200, GRAY);
        for i in 0..10 {
            img.put_pixel(i, 0, Rgb([0, 90, 200]));
        }
        let outcome = extractor.most_saturated(&img);
        match outcome {
            ExtractionOutcome::Success(color) => {
                assert_eq!(color.rgb, ColorSample::new(0, 90, 200))
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_too_few_valid_pixels_reports_insufficient_signal() {
        let mut img = RgbImage::from_pixel(200, 200, GRAY);
        for i in 0..9 {
            img.put_pixel(i, 10, Rgb([255, 0, 0]));
        }
        let outcome = ExtremeChromaExtractor::new().most_saturated(&img);
        assert!(matches!(
            outcome,
            ExtractionOutcome::InsufficientSignal {
                valid_pixels: 9,
                required: 10
            }
        ));
    }

    #[test]
    fn test_fallback_draws_from_lower_band() {
        // upper 70 %: gray with a handful of saturated pixels; lower band: muted brown
        let img = RgbImage::from_fn(200, 200, |x, y| {
            if y >= 140 {
                Rgb([90, 70, 60])
            } else if y == 10 && x < 5 {
                Rgb([255, 0, 0])
            } else {
                GRAY
            }
        });
        let color = ExtremeChromaExtractor::new().extract("sparse", &img);
        assert_eq!(color.rgb, ColorSample::new(90, 70, 60));
        assert!(!color.is_neutral_fallback());
    }

    #[test]
    fn test_fallback_prefers_most_chromatic_centroid() {
        // band split into three distinct tones; the olive-green one is most chromatic
        let img = RgbImage::from_fn(200, 200, |x, y| {
            if y < 140 {
                GRAY
            } else if x < 100 {
                Rgb([100, 100, 100])
            } else if x < 150 {
                Rgb([110, 150, 40])
            } else {
                Rgb([120, 110, 100])
            }
        });
        let rgb = ExtremeChromaExtractor::new().band_fallback(&img).unwrap();
        assert_eq!(rgb, ColorSample::new(110, 150, 40));
    }

    #[test]
    fn test_output_is_damped() {
        let img = RgbImage::from_pixel(200, 200, Rgb([40, 80, 220]));
        let color = ExtremeChromaExtractor::new().extract("blue", &img);
        let measured = ColorConverter::new().rgb_to_lab(ColorSample::new(40, 80, 220));
        assert!((color.lab.l() - measured.l() * 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_resizes_arbitrary_input() {
        let img = RgbImage::from_pixel(37, 411, Rgb([40, 80, 220]));
        let color = ExtremeChromaExtractor::new().extract("tall", &img);
        assert_eq!(color.rgb, ColorSample::new(40, 80, 220));
    }
}
