//! Contrast-limited adaptive histogram equalization on the LAB lightness.
//!
//! Only L is equalized; a and b are carried through untouched so the color
//! balance does not shift.

use image::{Rgb, RgbImage};

use super::denoise::reflect_101;
use crate::color::{lab_to_rgb8, rgb8_to_lab, srgb8_to_linear_table, Lab};
use crate::config::ClaheParams;

const BINS: usize = 256;

/// Equalize local contrast on the lightness channel.
pub fn color_correct(image: &RgbImage, params: &ClaheParams) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let table = srgb8_to_linear_table();
    let labs: Vec<Lab> = image.pixels().map(|p| rgb8_to_lab(p.0, &table)).collect();
    let lightness: Vec<u8> = labs.iter().map(|lab| quantize_l(lab.l)).collect();

    let equalized = clahe_plane(&lightness, width as usize, height as usize, params);

    RgbImage::from_fn(width, height, |x, y| {
        let i = y as usize * width as usize + x as usize;
        let lab = labs[i];
        // Shift by the change in quantized L so an identity mapping is lossless
        let delta = (equalized[i] as f32 - lightness[i] as f32) * 100.0 / 255.0;
        Rgb(lab_to_rgb8(Lab {
            l: (lab.l + delta).clamp(0.0, 100.0),
            ..lab
        }))
    })
}

#[inline]
fn quantize_l(l: f32) -> u8 {
    (l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8
}

/// CLAHE on a single 8-bit plane.
///
/// The plane is virtually extended with a reflected border up to a multiple
/// of the tile grid. Each tile histogram is clipped at
/// `max(1, clip_limit * tile_area / 256)`, the excess spread over all bins,
/// and pixels blend the four nearest tile mappings bilinearly.
///
/// A `clip_limit` of zero or below disables clipping, giving plain adaptive
/// histogram equalization. [`crate::config::PipelineConfig::sanitize`] never
/// produces such a value; direct callers may pass one.
pub fn clahe_plane(plane: &[u8], width: usize, height: usize, params: &ClaheParams) -> Vec<u8> {
    let grid_y = params.tile_grid.0.max(1) as usize;
    let grid_x = params.tile_grid.1.max(1) as usize;

    let padded_w = width.div_ceil(grid_x) * grid_x;
    let padded_h = height.div_ceil(grid_y) * grid_y;
    let tile_w = padded_w / grid_x;
    let tile_h = padded_h / grid_y;
    let tile_area = tile_w * tile_h;

    let clip = if params.clip_limit > 0.0 {
        ((params.clip_limit * tile_area as f32 / BINS as f32) as usize).max(1)
    } else {
        usize::MAX
    };
    let lut_scale = (BINS - 1) as f32 / tile_area as f32;

    let mut luts = vec![[0u8; BINS]; grid_x * grid_y];
    for ty in 0..grid_y {
        for tx in 0..grid_x {
            let mut hist = [0usize; BINS];
            for py in ty * tile_h..(ty + 1) * tile_h {
                let y = reflect_101(py as isize, height);
                for px in tx * tile_w..(tx + 1) * tile_w {
                    let x = reflect_101(px as isize, width);
                    hist[plane[y * width + x] as usize] += 1;
                }
            }
            clip_histogram(&mut hist, clip);
            luts[ty * grid_x + tx] = cumulative_lut(&hist, lut_scale);
        }
    }

    let inv_tw = 1.0 / tile_w as f32;
    let inv_th = 1.0 / tile_h as f32;
    let mut out = vec![0u8; width * height];

    for y in 0..height {
        let tyf = y as f32 * inv_th - 0.5;
        let ty1 = tyf.floor() as isize;
        let ya = tyf - ty1 as f32;
        let ty2 = (ty1 + 1).min(grid_y as isize - 1) as usize;
        let ty1 = ty1.max(0) as usize;

        for x in 0..width {
            let txf = x as f32 * inv_tw - 0.5;
            let tx1 = txf.floor() as isize;
            let xa = txf - tx1 as f32;
            let tx2 = (tx1 + 1).min(grid_x as isize - 1) as usize;
            let tx1 = tx1.max(0) as usize;

            let v = plane[y * width + x] as usize;
            let top = luts[ty1 * grid_x + tx1][v] as f32 * (1.0 - xa)
                + luts[ty1 * grid_x + tx2][v] as f32 * xa;
            let bottom = luts[ty2 * grid_x + tx1][v] as f32 * (1.0 - xa)
                + luts[ty2 * grid_x + tx2][v] as f32 * xa;
            let blended = top * (1.0 - ya) + bottom * ya;
            out[y * width + x] = blended.round().clamp(0.0, 255.0) as u8;
        }
    }

    out
}

/// Clip bins at `limit` and redistribute the excess over every bin.
fn clip_histogram(hist: &mut [usize; BINS], limit: usize) {
    let mut excess = 0usize;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }
    if excess == 0 {
        return;
    }

    let batch = excess / BINS;
    let residual = excess - batch * BINS;
    for bin in hist.iter_mut() {
        *bin += batch;
    }
    if residual > 0 {
        let step = (BINS / residual).max(1);
        for bin in hist.iter_mut().step_by(step).take(residual) {
            *bin += 1;
        }
    }
}

fn cumulative_lut(hist: &[usize; BINS], scale: f32) -> [u8; BINS] {
    let mut lut = [0u8; BINS];
    let mut sum = 0usize;
    for (entry, &count) in lut.iter_mut().zip(hist.iter()) {
        sum += count;
        *entry = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(values: &[u8]) -> u8 {
        let min = values.iter().copied().min().unwrap_or(0);
        let max = values.iter().copied().max().unwrap_or(0);
        max - min
    }

    #[test]
    fn test_clip_histogram_preserves_mass() {
        let mut hist = [0usize; BINS];
        hist[10] = 500;
        hist[20] = 100;
        hist[30] = 3;
        let before: usize = hist.iter().sum();

        clip_histogram(&mut hist, 40);

        assert_eq!(hist.iter().sum::<usize>(), before);
        assert!(hist.iter().all(|&b| b <= 40 + 3));
    }

    #[test]
    fn test_cumulative_lut_reaches_full_scale() {
        let mut hist = [0usize; BINS];
        hist[100] = 64;
        let lut = cumulative_lut(&hist, 255.0 / 64.0);
        assert_eq!(lut[99], 0);
        assert_eq!(lut[100], 255);
        assert_eq!(lut[255], 255);
    }

    #[test]
    fn test_uniform_plane_stays_uniform() {
        let plane = vec![90u8; 40 * 30];
        let out = clahe_plane(&plane, 40, 30, &ClaheParams::default());
        assert_eq!(out.len(), plane.len());
        assert!(out.iter().all(|&v| v == out[0]));
    }

    #[test]
    fn test_low_contrast_plane_is_stretched() {
        // Horizontal ramp confined to 100..=131
        let (w, h) = (64usize, 64usize);
        let plane: Vec<u8> = (0..w * h).map(|i| 100 + ((i % w) / 2) as u8).collect();
        let params = ClaheParams {
            clip_limit: 40.0,
            tile_grid: (2, 2),
        };

        let out = clahe_plane(&plane, w, h, &params);
        assert!(range(&out) > range(&plane));
    }

    #[test]
    fn test_non_positive_clip_limit_disables_clipping() {
        // Half 100, half 101 on a single 16x16 tile
        let plane: Vec<u8> = (0..256).map(|i| if i < 128 { 100 } else { 101 }).collect();
        let unclipped = ClaheParams {
            clip_limit: 0.0,
            tile_grid: (1, 1),
        };
        let clipped = ClaheParams {
            clip_limit: 2.0,
            tile_grid: (1, 1),
        };

        let full = clahe_plane(&plane, 16, 16, &unclipped);
        let limited = clahe_plane(&plane, 16, 16, &clipped);

        assert_eq!(full.iter().copied().max(), Some(255));
        assert!(full[0] > 120);
        assert!(limited.iter().all(|&v| v < 128));
    }

    #[test]
    fn test_non_divisible_dimensions() {
        let plane: Vec<u8> = (0..13 * 7).map(|i| (i * 3 % 256) as u8).collect();
        let out = clahe_plane(&plane, 13, 7, &ClaheParams::default());
        assert_eq!(out.len(), 13 * 7);

        let single = clahe_plane(&[42], 1, 1, &ClaheParams::default());
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_color_correct_keeps_grays_neutral() {
        let img = RgbImage::from_fn(32, 32, |x, y| {
            let v = (60 + x * 2 + y) as u8;
            Rgb([v, v, v])
        });
        let out = color_correct(&img, &ClaheParams::default());

        assert_eq!(out.dimensions(), img.dimensions());
        for p in out.pixels() {
            let [r, g, b] = p.0;
            let spread = r.max(g).max(b) - r.min(g).min(b);
            assert!(spread <= 2, "gray pixel picked up color: {:?}", p);
        }
    }

    #[test]
    fn test_color_correct_uniform_image_stays_uniform() {
        let img = RgbImage::from_pixel(20, 12, Rgb([150, 90, 60]));
        let out = color_correct(&img, &ClaheParams::default());
        let first = *out.get_pixel(0, 0);
        assert!(out.pixels().all(|p| *p == first));
    }
}
