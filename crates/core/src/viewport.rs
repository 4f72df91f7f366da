//! Logical canvas size and device pixel ratio.
//!
//! All simulation and drawing coordinates are logical pixels. Surfaces size
//! their backing buffers with [`Viewport::physical_size`] and scale by the
//! pixel ratio so high-density displays stay sharp without the simulation
//! noticing.

use crate::error::SpacetimeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Creates a viewport, rejecting non-positive or non-finite sizes.
    ///
    /// A non-positive or non-finite pixel ratio falls back to 1, the same
    /// default a browser reports when it has none.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Result<Self, SpacetimeError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SpacetimeError::InvalidDimensions);
        }
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Ok(Self {
            width,
            height,
            device_pixel_ratio,
        })
    }

    /// Backing buffer size in device pixels, rounded to the nearest pixel and at least 1.
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: f64| (v * self.device_pixel_ratio).round().clamp(1.0, u32::MAX as f64) as u32;
        (scale(self.width), scale(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_size_scales_by_pixel_ratio() {
        let vp = Viewport::new(1280.0, 800.0, 2.0).unwrap();
        assert_eq!(vp.physical_size(), (2560, 1600));
    }

    #[test]
    fn fractional_ratio_rounds() {
        let vp = Viewport::new(101.0, 50.0, 1.5).unwrap();
        assert_eq!(vp.physical_size(), (152, 75));
    }

    #[test]
    fn missing_ratio_defaults_to_one() {
        for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let vp = Viewport::new(10.0, 10.0, bad).unwrap();
            assert_eq!(vp.device_pixel_ratio, 1.0);
        }
    }

    #[test]
    fn rejects_degenerate_sizes() {
        assert!(Viewport::new(0.0, 10.0, 1.0).is_err());
        assert!(Viewport::new(10.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(f64::NAN, 10.0, 1.0).is_err());
        assert!(Viewport::new(10.0, f64::INFINITY, 1.0).is_err());
    }

    #[test]
    fn tiny_viewport_still_has_one_pixel() {
        let vp = Viewport::new(0.1, 0.1, 1.0).unwrap();
        assert_eq!(vp.physical_size(), (1, 1));
    }
}
