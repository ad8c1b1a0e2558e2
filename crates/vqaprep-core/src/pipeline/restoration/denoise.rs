//! Non-local-means denoising, one color plane at a time.
//!
//! For every offset in the search window the squared difference between the
//! plane and its shifted copy is summed over the template window with an
//! integral image, so each offset costs O(pixels) regardless of patch size.
//! The weight of a candidate is `exp(-mean_sq_diff / h^2)`.

use image::{Rgb, RgbImage};
use rayon::prelude::*;

use crate::config::DenoiseParams;

/// Denoise an RGB image; the input is left untouched.
pub fn denoise(image: &RgbImage, params: &DenoiseParams) -> RgbImage {
    let (width, height) = image.dimensions();
    if params.strength <= 0.0 || width == 0 || height == 0 {
        return image.clone();
    }
    let (w, h) = (width as usize, height as usize);

    let planes: Vec<Vec<f32>> = (0..3)
        .map(|c| image.as_raw().iter().skip(c).step_by(3).map(|&v| v as f32).collect())
        .collect();

    let filtered: Vec<Vec<f32>> = planes
        .par_iter()
        .map(|plane| denoise_plane(plane, w, h, params))
        .collect();

    RgbImage::from_fn(width, height, |x, y| {
        let i = y as usize * w + x as usize;
        Rgb([to_u8(filtered[0][i]), to_u8(filtered[1][i]), to_u8(filtered[2][i])])
    })
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Mirror index `i` into `[0, n)` without repeating the edge sample.
pub(crate) fn reflect_101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let period = 2 * (n - 1);
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}

/// Plane with a reflected border so shifted reads never go out of range.
struct PaddedPlane {
    data: Vec<f32>,
    stride: usize,
    border: usize,
}

impl PaddedPlane {
    fn new(plane: &[f32], width: usize, height: usize, border: usize) -> Self {
        let stride = width + 2 * border;
        let rows = height + 2 * border;
        let mut data = Vec::with_capacity(stride * rows);
        for py in 0..rows {
            let y = reflect_101(py as isize - border as isize, height);
            for px in 0..stride {
                let x = reflect_101(px as isize - border as isize, width);
                data.push(plane[y * width + x]);
            }
        }
        Self {
            data,
            stride,
            border,
        }
    }

    /// Sample at image coordinates, which may lie inside the border.
    #[inline]
    fn at(&self, y: isize, x: isize) -> f32 {
        let py = (y + self.border as isize) as usize;
        let px = (x + self.border as isize) as usize;
        self.data[py * self.stride + px]
    }
}

fn denoise_plane(plane: &[f32], width: usize, height: usize, params: &DenoiseParams) -> Vec<f32> {
    let t = (params.template_window / 2) as isize;
    let s = (params.search_window / 2) as isize;
    let padded = PaddedPlane::new(plane, width, height, (t + s) as usize);

    let h2 = params.strength * params.strength;
    let patch_area = (params.template_window * params.template_window) as f64;

    // Integral image over the region the template windows can touch
    let region_w = width + 2 * t as usize;
    let region_h = height + 2 * t as usize;
    let istride = region_w + 1;
    let mut integral = vec![0.0f64; istride * (region_h + 1)];

    let mut weight_sum = vec![0.0f32; width * height];
    let mut value_sum = vec![0.0f32; width * height];

    for dy in -s..=s {
        for dx in -s..=s {
            for ry in 0..region_h {
                let y = ry as isize - t;
                let mut row = 0.0f64;
                for rx in 0..region_w {
                    let x = rx as isize - t;
                    let d = (padded.at(y, x) - padded.at(y + dy, x + dx)) as f64;
                    row += d * d;
                    integral[(ry + 1) * istride + rx + 1] = integral[ry * istride + rx + 1] + row;
                }
            }

            let tw = 2 * t as usize + 1;
            for y in 0..height {
                for x in 0..width {
                    let ssd = integral[(y + tw) * istride + x + tw]
                        - integral[y * istride + x + tw]
                        - integral[(y + tw) * istride + x]
                        + integral[y * istride + x];
                    let mean = (ssd / patch_area).max(0.0) as f32;
                    let weight = (-mean / h2).exp();
                    let i = y * width + x;
                    weight_sum[i] += weight;
                    value_sum[i] += weight * padded.at(y as isize + dy, x as isize + dx);
                }
            }
        }
    }

    // The zero offset always contributes weight 1, so the sum is never zero
    value_sum
        .iter()
        .zip(&weight_sum)
        .map(|(v, w)| v / w)
        .collect()
}
