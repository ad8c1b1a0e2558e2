//! Normalization stage: linear rescale from [0, 255] to [0.0, 1.0].

use image::{Rgb32FImage, RgbImage};

/// Divide every sample by 255. The source range is bounded, so no clipping.
pub fn normalize(image: &RgbImage) -> Rgb32FImage {
    let data: Vec<f32> = image.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
    let (width, height) = image.dimensions();
    Rgb32FImage::from_raw(width, height, data)
        .unwrap_or_else(|| Rgb32FImage::new(width, height))
}

pub fn normalize_batch(images: &[RgbImage]) -> Vec<Rgb32FImage> {
    images.iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_extremes_map_to_unit_range() {
        let img = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let out = normalize(&img);
        assert_eq!(out.get_pixel(0, 0).0, [0.0, 0.0, 0.0]);
        assert_eq!(out.get_pixel(1, 0).0, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_every_value_in_bounds() {
        let img = RgbImage::from_fn(16, 16, |x, y| {
            let v = (y * 16 + x) as u8;
            Rgb([v, 255 - v, v / 2])
        });
        let out = normalize(&img);
        assert_eq!(out.dimensions(), (16, 16));
        assert!(out.as_raw().iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert!((out.get_pixel(3, 0).0[0] - 3.0 / 255.0).abs() < 1e-7);
    }

    #[test]
    fn test_batch_preserves_order_and_length() {
        let images = vec![
            RgbImage::from_pixel(1, 1, Rgb([51, 0, 0])),
            RgbImage::from_pixel(2, 3, Rgb([102, 0, 0])),
        ];
        let out = normalize_batch(&images);
        assert_eq!(out.len(), 2);
        assert!((out[0].get_pixel(0, 0).0[0] - 0.2).abs() < 1e-6);
        assert_eq!(out[1].dimensions(), (2, 3));
    }
}
