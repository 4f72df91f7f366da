//! Reproducible description of a rendered scene.
//!
//! A [`Seed`] captures everything needed to recreate a headless render:
//! theme, viewport, config overrides, PRNG seed, frame count and spacing,
//! and an optional fixed pointer. Scene files are JSON-serialized seeds.

use crate::error::SpacetimeError;
use crate::theme::Theme;
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};

/// Frame spacing used when a scene does not set one (60 fps).
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Reproducible description of a rendered scene.
///
/// Two identical seeds rendered by the same binary produce bit-identical
/// frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub theme: Theme,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_device_pixel_ratio")]
    pub device_pixel_ratio: f64,
    /// Config overrides, keyed by config field name.
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    /// Frames to simulate; the last one is the snapshot.
    #[serde(default = "default_frames")]
    pub frames: usize,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: f64,
    /// Pointer held at this logical position for the whole run.
    #[serde(default)]
    pub pointer: Option<[f64; 2]>,
}

fn default_device_pixel_ratio() -> f64 {
    1.0
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

fn default_frames() -> usize {
    1
}

fn default_frame_interval_ms() -> f64 {
    DEFAULT_FRAME_INTERVAL_MS
}

impl Seed {
    /// Creates a seed with no overrides, pixel ratio 1, a single frame and no pointer.
    pub fn new(theme: Theme, width: f64, height: f64, seed: u64) -> Self {
        Self {
            theme,
            width,
            height,
            device_pixel_ratio: default_device_pixel_ratio(),
            params: empty_params(),
            seed,
            frames: default_frames(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            pointer: None,
        }
    }

    /// The viewport this seed renders into.
    pub fn viewport(&self) -> Result<Viewport, SpacetimeError> {
        Viewport::new(self.width, self.height, self.device_pixel_ratio)
    }

    /// Checks dimensions, buffer size, timing, params shape and pointer.
    pub fn validate(&self) -> Result<(), SpacetimeError> {
        let (w, h) = self.viewport()?.physical_size();
        (w as usize)
            .checked_mul(h as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or(SpacetimeError::InvalidDimensions)?;
        if !(self.frame_interval_ms.is_finite() && self.frame_interval_ms >= 0.0) {
            return Err(SpacetimeError::InvalidConfig(format!(
                "frame_interval_ms must be finite and >= 0, got {}",
                self.frame_interval_ms
            )));
        }
        if !self.params.is_object() {
            return Err(SpacetimeError::InvalidConfig(
                "params must be a JSON object".to_string(),
            ));
        }
        if let Some([x, y]) = self.pointer {
            if !(x.is_finite() && y.is_finite()) {
                return Err(SpacetimeError::InvalidConfig(format!(
                    "pointer must be finite, got ({x}, {y})"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_uses_defaults() {
        let s = Seed::new(Theme::Dark, 1280.0, 800.0, 42);
        assert_eq!(s.theme, Theme::Dark);
        assert_eq!(s.device_pixel_ratio, 1.0);
        assert_eq!(s.frames, 1);
        assert_eq!(s.params, json!({}));
        assert!(s.pointer.is_none());
        assert!(s.validate().is_ok());
    }

    #[test]
    fn json_round_trip_with_overrides() {
        let mut s = Seed::new(Theme::Light, 640.0, 480.0, 99);
        s.params = json!({ "max_displacement": 24.0, "grid_color": "#336699" });
        s.frames = 120;
        s.pointer = Some([320.0, 200.0]);
        let json = serde_json::to_string_pretty(&s).unwrap();
        let restored: Seed = serde_json::from_str(&json).unwrap();
        assert_eq!(s, restored);
    }

    #[test]
    fn minimal_scene_file_fills_defaults() {
        let s: Seed = serde_json::from_value(json!({
            "theme": "dark",
            "width": 800,
            "height": 600,
            "seed": 7
        }))
        .unwrap();
        assert_eq!(s, Seed::new(Theme::Dark, 800.0, 600.0, 7));
    }

    #[test]
    fn validate_rejects_zero_width() {
        let s = Seed::new(Theme::Dark, 0.0, 600.0, 1);
        assert!(matches!(s.validate(), Err(SpacetimeError::InvalidDimensions)));
    }

    #[test]
    fn validate_rejects_non_finite_height() {
        let s = Seed::new(Theme::Dark, 800.0, f64::NAN, 1);
        assert!(matches!(s.validate(), Err(SpacetimeError::InvalidDimensions)));
    }

    #[test]
    fn validate_rejects_negative_interval() {
        let mut s = Seed::new(Theme::Dark, 800.0, 600.0, 1);
        s.frame_interval_ms = -1.0;
        assert!(matches!(s.validate(), Err(SpacetimeError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_non_object_params() {
        let mut s = Seed::new(Theme::Dark, 800.0, 600.0, 1);
        s.params = json!([1, 2]);
        assert!(matches!(s.validate(), Err(SpacetimeError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_non_finite_pointer() {
        let mut s = Seed::new(Theme::Dark, 800.0, 600.0, 1);
        s.pointer = Some([f64::INFINITY, 3.0]);
        assert!(s.validate().is_err());
    }
}
