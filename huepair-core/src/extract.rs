//! Dominant color extraction
//!
//! The image is resampled to a small square, every n-th pixel of the
//! flattened sample is visited, background-like pixels (transparent,
//! near-white, near-black) are dropped and the survivors are averaged.
//! Cost is bounded by the sample size, not by the source resolution.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use log::debug;

use crate::color::RgbColor;
use crate::config::AnalysisConfig;

/// Returned by [`extract_dominant_color`] when no pixel survives filtering.
pub const FALLBACK_GRAY: RgbColor = RgbColor::new(128, 128, 128);

/// Outcome of one sampling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DominantSample {
    /// Average of the kept pixels, `None` when every sample was filtered out
    pub color: Option<RgbColor>,
    /// Pixels visited
    pub sampled: usize,
    /// Pixels that passed the background filters
    pub kept: usize,
}

impl DominantSample {
    pub fn color_or_fallback(&self) -> RgbColor {
        self.color.unwrap_or(FALLBACK_GRAY)
    }
}

/// Whether a pixel looks like background rather than subject.
pub fn is_background(pixel: Rgba<u8>, config: &AnalysisConfig) -> bool {
    let [r, g, b, a] = pixel.0;
    let white = config.white_threshold;
    let black = config.black_threshold;
    a < config.min_alpha
        || (r > white && g > white && b > white)
        || (r < black && g < black && b < black)
}

/// Run the sampler and report how many pixels were visited and kept.
pub fn sample_dominant(image: &DynamicImage, config: &AnalysisConfig) -> DominantSample {
    let config = config.normalized();
    let sample = resample(image, config.sample_size);

    let mut totals = [0u64; 3];
    let mut sampled = 0usize;
    let mut kept = 0usize;

    for pixel in sample.pixels().step_by(config.sample_stride) {
        sampled += 1;
        if is_background(*pixel, &config) {
            continue;
        }
        let [r, g, b, _] = pixel.0;
        totals[0] += u64::from(r);
        totals[1] += u64::from(g);
        totals[2] += u64::from(b);
        kept += 1;
    }

    let color = (kept > 0).then(|| {
        let average = |total: u64| (total as f64 / kept as f64).round() as u8;
        RgbColor::new(average(totals[0]), average(totals[1]), average(totals[2]))
    });

    debug!(
        "sampled {} pixels, kept {}, dominant {:?}",
        sampled, kept, color
    );

    DominantSample {
        color,
        sampled,
        kept,
    }
}

/// Dominant color, or `None` when nothing but background was sampled.
pub fn dominant_color(image: &DynamicImage, config: &AnalysisConfig) -> Option<RgbColor> {
    sample_dominant(image, config).color
}

/// Dominant color with the default sampler, falling back to [`FALLBACK_GRAY`].
pub fn extract_dominant_color(image: &DynamicImage) -> RgbColor {
    sample_dominant(image, &AnalysisConfig::default()).color_or_fallback()
}

fn resample(image: &DynamicImage, size: u32) -> RgbaImage {
    if image.dimensions() == (size, size) {
        return image.to_rgba8();
    }
    image.resize_exact(size, size, FilterType::Triangle).to_rgba8()
}
