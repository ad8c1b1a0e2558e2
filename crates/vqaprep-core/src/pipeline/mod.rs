//! Per-image normalization pipeline.
//!
//! Stages run in a fixed order, each producing a new image:
//! - `geometry`: aspect-preserving resize and padding to the batch size
//! - `restoration`: non-local-means denoising, then CLAHE on lightness
//! - `enhancement`: unsharp-mask sharpening
//! - `normalization`: optional rescale to floating [0, 1]

pub mod enhancement;
pub mod geometry;
pub mod normalization;
pub mod restoration;


pub use enhancement::sharpen;
pub use geometry::{fit_within, pad_to, resize_and_pad, resize_exact};
pub use normalization::{normalize, normalize_batch};
pub use restoration::{clahe_plane, color_correct, denoise, restore};

use std::path::Path;
use std::time::Instant;

use image::RgbImage;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::decoders;
use crate::error::Result;
use crate::models::{PreprocessedImage, TargetSize};

/// Run every stage on an already-decoded image.
pub fn preprocess_rgb(
    image: &RgbImage,
    target: TargetSize,
    config: &PipelineConfig,
) -> Result<PreprocessedImage> {
    let start = Instant::now();
    let padded = resize_and_pad(image, target, config.pad_anchor)?;
    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "resize_and_pad");

    let start = Instant::now();
    let denoised = denoise(&padded, &config.denoise);
    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "denoise");

    let start = Instant::now();
    let corrected = color_correct(&denoised, &config.color_correction);
    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "color_correct");

    let start = Instant::now();
    let sharpened = sharpen(&corrected, &config.sharpen);
    debug!(elapsed_ms = start.elapsed().as_millis() as u64, "sharpen");

    if config.do_normalize {
        Ok(PreprocessedImage::Rgb32F(normalize(&sharpened)))
    } else {
        Ok(PreprocessedImage::Rgb8(sharpened))
    }
}

/// Decode `path` and run every stage on it.
pub fn preprocess_image(
    path: &Path,
    target: TargetSize,
    config: &PipelineConfig,
) -> Result<PreprocessedImage> {
    let image = decoders::read_image(path)?;
    preprocess_rgb(&image, target, config)
}
