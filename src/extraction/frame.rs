//! Pixel buffer preparation shared by both extraction strategies
//!
//! Validates and decodes input buffers, resizes to a canonical square,
//! and cuts out the pixel populations the extractors work on (central
//! crop, lower band) with brightness masking.

use image::{imageops, imageops::FilterType, RgbImage};

use crate::color::ColorSample;
use crate::{AnalysisError, Result};

/// Wrap a raw interleaved RGB buffer, checking it matches the dimensions
///
/// # Errors
///
/// Returns `AnalysisError::InvalidImageBuffer` if the image is empty or the
/// byte count differs from `width * height * 3`
pub fn frame_from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<RgbImage> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .unwrap_or(usize::MAX);
    let len = data.len();

    if width == 0 || height == 0 || len != expected {
        return Err(AnalysisError::InvalidImageBuffer {
            width,
            height,
            expected,
            len,
        });
    }

    RgbImage::from_raw(width, height, data).ok_or(AnalysisError::InvalidImageBuffer {
        width,
        height,
        expected,
        len,
    })
}

/// Decode encoded image bytes (PNG, JPEG) into an RGB buffer
pub fn decode(bytes: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| AnalysisError::image_decode("Failed to decode image bytes", e))?;
    Ok(img.to_rgb8())
}

/// Resize to a `size`×`size` square
///
/// Nearest-neighbor sampling keeps every output pixel an exact copy of an
/// input pixel, so uniform regions stay uniform at any input size.
pub fn to_canonical(image: &RgbImage, size: u32) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(AnalysisError::degenerate(
            "resize",
            format!("image has no pixels ({}x{})", width, height),
        ));
    }
    if (width, height) == (size, size) {
        return Ok(image.clone());
    }
    Ok(imageops::resize(image, size, size, FilterType::Nearest))
}

/// Pixels of the centered window `[start, end)` on both axes, row-major
pub fn crop_pixels(image: &RgbImage, start: f64, end: f64) -> Vec<ColorSample> {
    let (width, height) = image.dimensions();
    let (x0, x1) = (fraction_index(width, start), fraction_index(width, end));
    let (y0, y1) = (fraction_index(height, start), fraction_index(height, end));

    let mut pixels = Vec::with_capacity((x1.saturating_sub(x0) * y1.saturating_sub(y0)) as usize);
    for y in y0..y1 {
        for x in x0..x1 {
            pixels.push(ColorSample::from(*image.get_pixel(x, y)));
        }
    }
    pixels
}

/// Pixels of the full-width band from `start` (fraction of height) to the bottom
pub fn band_pixels(image: &RgbImage, start: f64) -> Vec<ColorSample> {
    let (width, height) = image.dimensions();
    let y0 = fraction_index(height, start);

    let mut pixels = Vec::with_capacity((width * (height - y0)) as usize);
    for y in y0..height {
        for x in 0..width {
            pixels.push(ColorSample::from(*image.get_pixel(x, y)));
        }
    }
    pixels
}

/// Result of applying a brightness window to a pixel population
#[derive(Debug, Clone, PartialEq)]
pub struct BrightnessSelection {
    pub pixels: Vec<ColorSample>,
    /// False when the window rejected everything and the input was kept
    pub masked: bool,
}

/// Keep pixels with `min < brightness < max`
///
/// If no pixel passes, the unfiltered population is returned instead.
pub fn brightness_window(pixels: Vec<ColorSample>, min: f64, max: f64) -> BrightnessSelection {
    let kept: Vec<ColorSample> = pixels
        .iter()
        .copied()
        .filter(|p| {
            let v = p.brightness();
            v > min && v < max
        })
        .collect();

    if kept.is_empty() {
        BrightnessSelection {
            pixels,
            masked: false,
        }
    } else {
        BrightnessSelection {
            pixels: kept,
            masked: true,
        }
    }
}

fn fraction_index(extent: u32, fraction: f64) -> u32 {
    ((f64::from(extent) * fraction).floor() as u32).min(extent)
}
