//! Enhancement stage: unsharp-mask sharpening.

use image::{Rgb, Rgb32FImage, RgbImage};
use imageproc::filter::gaussian_blur_f32;

use crate::config::SharpenParams;

/// Sharpen with an unsharp mask: `out = orig + amount * (orig - blur(orig))`,
/// saturated to [0, 255].
pub fn sharpen(image: &RgbImage, params: &SharpenParams) -> RgbImage {
    let (width, height) = image.dimensions();
    if params.amount <= 0.0 || width == 0 || height == 0 || params.sigma <= 0.0 {
        return image.clone();
    }

    // Blur in f32: imageproc truncates when converting back to u8
    let float = Rgb32FImage::from_fn(width, height, |x, y| {
        let p = image.get_pixel(x, y).0;
        Rgb([p[0] as f32, p[1] as f32, p[2] as f32])
    });
    let blurred = gaussian_blur_f32(&float, params.sigma);
    let amount = params.amount;

    RgbImage::from_fn(width, height, |x, y| {
        let orig = image.get_pixel(x, y).0;
        let blur = blurred.get_pixel(x, y).0;
        let mut px = [0u8; 3];
        for c in 0..3 {
            let v = (1.0 + amount) * orig[c] as f32 - amount * blur[c];
            px[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        Rgb(px)
    })
}
