//! Aspect-preserving resize followed by constant padding to the target size.
//!
//! Interpolation is fixed: a box (area-averaging) convolution when shrinking
//! and bilinear when enlarging, both via `fast_image_resize`. Padding is black.

use fast_image_resize as fr;
use image::{imageops, RgbImage};

use crate::error::{PipelineError, Result};
use crate::models::{PadAnchor, TargetSize};

const STAGE: &str = "resize";

/// Dimensions (height, width) of the resized region before padding.
///
/// Uses one scale factor for both axes so the aspect ratio survives, and
/// clamps to [1, target] so rounding never overflows the canvas.
pub fn fit_within(source_height: u32, source_width: u32, target: TargetSize) -> (u32, u32) {
    let scale = (target.height as f64 / source_height as f64)
        .min(target.width as f64 / source_width as f64);

    let height = ((source_height as f64 * scale).round() as u32).clamp(1, target.height);
    let width = ((source_width as f64 * scale).round() as u32).clamp(1, target.width);
    (height, width)
}

/// Resize `image` to fit inside `target` and pad it to exactly `target`.
pub fn resize_and_pad(image: &RgbImage, target: TargetSize, anchor: PadAnchor) -> Result<RgbImage> {
    target.validate()?;
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(PipelineError::transform(STAGE, "source image has no pixels"));
    }

    let (new_h, new_w) = fit_within(src_h, src_w, target);
    let resized = resize_exact(image, new_w, new_h)?;
    Ok(pad_to(&resized, target, anchor))
}

/// Resample to exactly `width` x `height`.
pub fn resize_exact(image: &RgbImage, width: u32, height: u32) -> Result<RgbImage> {
    let (src_w, src_h) = image.dimensions();
    if (src_w, src_h) == (width, height) {
        return Ok(image.clone());
    }

    let shrinking = (width as u64) * (height as u64) < (src_w as u64) * (src_h as u64);
    let filter = if shrinking {
        fr::FilterType::Box
    } else {
        fr::FilterType::Bilinear
    };

    let src_image = fr::images::Image::from_vec_u8(
        src_w,
        src_h,
        image.as_raw().clone(),
        fr::PixelType::U8x3,
    )
    .map_err(|e| PipelineError::transform(STAGE, format!("invalid source buffer: {}", e)))?;

    let mut dst_image = fr::images::Image::new(width, height, fr::PixelType::U8x3);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(filter));
    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| PipelineError::transform(STAGE, e))?;

    RgbImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| PipelineError::transform(STAGE, "resized buffer has unexpected length"))
}

/// Place `image` on a black canvas of exactly `target`.
///
/// `image` must already fit inside `target`.
pub fn pad_to(image: &RgbImage, target: TargetSize, anchor: PadAnchor) -> RgbImage {
    let (w, h) = image.dimensions();
    if (h, w) == (target.height, target.width) {
        return image.clone();
    }

    let (x, y) = match anchor {
        PadAnchor::TopLeft => (0, 0),
        PadAnchor::Center => (
            target.width.saturating_sub(w) / 2,
            target.height.saturating_sub(h) / 2,
        ),
    };

    let mut canvas = RgbImage::new(target.width, target.height);
    imageops::replace(&mut canvas, image, x as i64, y as i64);
    canvas
}
