//! Stage parameters, their defaults, and sanitization.

use serde::{Deserialize, Serialize};

/// Non-local-means parameters, applied to each color plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseParams {
    /// Filter strength `h`. Larger removes more noise and more detail.
    pub strength: f32,
    /// Side of the square patch compared between pixels (odd).
    pub template_window: u32,
    /// Side of the square region searched for similar patches (odd).
    pub search_window: u32,
}

impl Default for DenoiseParams {
    fn default() -> Self {
        Self {
            strength: 3.0,
            template_window: 7,
            search_window: 21,
        }
    }
}

impl DenoiseParams {
    pub(crate) fn sanitize(&mut self) {
        // NaN survives clamp
        if !self.strength.is_finite() {
            self.strength = DenoiseParams::default().strength;
        }
        self.strength = self.strength.clamp(0.0, 100.0);
        self.template_window = make_odd(self.template_window.max(1));
        self.search_window = make_odd(self.search_window.max(self.template_window));
    }
}

/// Contrast-limited adaptive histogram equalization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaheParams {
    pub clip_limit: f32,
    /// Tile grid as (rows, columns).
    pub tile_grid: (u32, u32),
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tile_grid: (8, 8),
        }
    }
}

impl ClaheParams {
    pub(crate) fn sanitize(&mut self) {
        if !self.clip_limit.is_finite() || self.clip_limit <= 0.0 {
            self.clip_limit = ClaheParams::default().clip_limit;
        }
        self.tile_grid = (self.tile_grid.0.clamp(1, 64), self.tile_grid.1.clamp(1, 64));
    }
}

/// Unsharp-mask parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpenParams {
    /// Weight of the detail signal added back to the image.
    pub amount: f32,
    /// Gaussian sigma of the blur that defines "detail".
    pub sigma: f32,
}

impl Default for SharpenParams {
    fn default() -> Self {
        Self {
            amount: 1.5,
            sigma: 2.0,
        }
    }
}

impl SharpenParams {
    pub(crate) fn sanitize(&mut self) {
        if !self.amount.is_finite() {
            self.amount = SharpenParams::default().amount;
        }
        self.amount = self.amount.clamp(0.0, 10.0);
        // imageproc panics on a non-positive sigma
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            self.sigma = SharpenParams::default().sigma;
        }
    }
}

fn make_odd(v: u32) -> u32 {
    if v % 2 == 0 {
        v + 1
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denoise_sanitize_forces_odd_windows() {
        let mut params = DenoiseParams {
            strength: -1.0,
            template_window: 6,
            search_window: 4,
        };
        params.sanitize();
        assert_eq!(params.strength, 0.0);
        assert_eq!(params.template_window, 7);
        assert_eq!(params.search_window, 7);
    }

    #[test]
    fn test_clahe_sanitize() {
        let mut params = ClaheParams {
            clip_limit: f32::NAN,
            tile_grid: (0, 100),
        };
        params.sanitize();
        assert_eq!(params.clip_limit, 2.0);
        assert_eq!(params.tile_grid, (1, 64));
    }

    #[test]
    fn test_sharpen_sanitize_resets_bad_sigma() {
        let mut params = SharpenParams {
            amount: 1.5,
            sigma: 0.0,
        };
        params.sanitize();
        assert_eq!(params.sigma, 2.0);
    }

    #[test]
    fn test_non_finite_strength_and_amount_reset() {
        let mut denoise = DenoiseParams {
            strength: f32::NAN,
            ..DenoiseParams::default()
        };
        denoise.sanitize();
        assert_eq!(denoise.strength, 3.0);

        let mut sharpen = SharpenParams {
            amount: f32::NAN,
            sigma: 2.0,
        };
        sharpen.sanitize();
        assert_eq!(sharpen.amount, 1.5);

        let mut sharpen = SharpenParams {
            amount: f32::INFINITY,
            sigma: 2.0,
        };
        sharpen.sanitize();
        assert_eq!(sharpen.amount, 1.5);
    }
}
