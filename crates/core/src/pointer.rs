//! Pointer tracking with exponential smoothing.
//!
//! Input events write the raw position whenever they arrive; the frame loop
//! eases the smoothed position toward it once per frame. The field only ever
//! sees the smoothed position, which gives the grid its lagging, fluid pull.

use crate::field::{Mass, POINTER_SOFTENING_RATIO};
use crate::theme::Config;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Far off-canvas position meaning "no pointer".
pub const INACTIVE_POINTER: DVec2 = DVec2::new(-1000.0, -1000.0);

/// Fraction of the remaining gap closed per frame.
pub const POINTER_SMOOTHING: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    raw: DVec2,
    smoothed: DVec2,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            raw: INACTIVE_POINTER,
            smoothed: INACTIVE_POINTER,
        }
    }
}

impl PointerState {
    /// Records a pointer position in logical canvas pixels.
    pub fn moved_to(&mut self, position: DVec2) {
        self.raw = position;
    }

    /// The pointer left the canvas; the smoothed position drifts off-screen.
    pub fn left(&mut self) {
        self.raw = INACTIVE_POINTER;
    }

    /// One frame of exponential smoothing, applied per axis.
    pub fn smooth(&mut self) {
        self.smoothed += (self.raw - self.smoothed) * POINTER_SMOOTHING;
    }

    pub fn raw(&self) -> DVec2 {
        self.raw
    }

    pub fn smoothed(&self) -> DVec2 {
        self.smoothed
    }

    /// Whether the smoothed pointer is on the canvas (both coordinates positive).
    pub fn is_active(&self) -> bool {
        self.smoothed.x > 0.0 && self.smoothed.y > 0.0
    }

    /// The pointer as a field source, if active.
    pub fn mass(&self, config: &Config) -> Option<Mass> {
        self.is_active().then(|| {
            Mass::new(
                self.smoothed,
                config.cursor_mass,
                config.softening_length * POINTER_SOFTENING_RATIO,
            )
        })
    }
}
