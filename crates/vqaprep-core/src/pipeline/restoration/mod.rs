//! Restoration stage: denoising followed by contrast correction.

mod clahe;
mod denoise;

pub use clahe::{clahe_plane, color_correct};
pub use denoise::denoise;

use image::RgbImage;

use crate::config::PipelineConfig;

/// Denoise, then equalize lightness. Order matters: CLAHE amplifies noise.
pub fn restore(image: &RgbImage, config: &PipelineConfig) -> RgbImage {
    let denoised = denoise(image, &config.denoise);
    color_correct(&denoised, &config.color_correction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_restore_is_denoise_then_color_correct() {
        let mut config = PipelineConfig::default();
        config.denoise.template_window = 3;
        config.denoise.search_window = 5;
        let img = RgbImage::from_fn(20, 14, |x, y| Rgb([(x * 11) as u8, (y * 17) as u8, 64]));

        let expected = color_correct(&denoise(&img, &config.denoise), &config.color_correction);
        assert_eq!(restore(&img, &config), expected);
    }
}
