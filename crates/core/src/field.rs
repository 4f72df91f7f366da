//! Softened potential-gradient field and the saturating displacement law.
//!
//! Every mass pulls nearby points toward itself with a Plummer-style softened
//! inverse-square falloff. The summed pull is amplified and then squashed by
//! `tanh` so no point ever moves `max_displacement` or more, however close it
//! sits to a mass. All functions here are pure.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Amplification applied to the summed gradient before saturation.
pub const DISPLACEMENT_SCALE: f64 = 1000.0;

/// The pointer mass uses a slightly tighter softening than navigator masses.
pub const POINTER_SOFTENING_RATIO: f64 = 0.8;

// tanh rounds to exactly 1.0 for large arguments; keep the bound strict.
const SATURATION_CEILING: f64 = 1.0 - 1e-9;

/// A point source of the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mass {
    pub position: DVec2,
    pub strength: f64,
    /// Must be strictly positive.
    pub softening: f64,
}

impl Mass {
    pub fn new(position: DVec2, strength: f64, softening: f64) -> Self {
        Self {
            position,
            strength,
            softening,
        }
    }
}

/// Gradient of the softened potential of one source, evaluated at `point`.
///
/// `d = point - source`, `s = sqrt(|d|^2 + softening^2)`, result `-d * strength / s^3`.
/// Finite for any `softening > 0`; exactly zero when `point == source`.
pub fn potential_gradient(point: DVec2, source: DVec2, strength: f64, softening: f64) -> DVec2 {
    let d = point - source;
    let softened = (d.length_squared() + softening * softening).sqrt();
    let factor = strength / (softened * softened * softened);
    -d * factor
}

/// Combined, saturated displacement at `point` from `sources` and an optional pointer mass.
///
/// The summed gradient is scaled by [`DISPLACEMENT_SCALE`], then its magnitude
/// `m` is mapped to `max_displacement * tanh(m / max_displacement)` with the
/// direction preserved. Returns `DVec2::ZERO` when the field cancels out.
pub fn total_displacement<'a, I>(
    point: DVec2,
    sources: I,
    pointer: Option<&'a Mass>,
    max_displacement: f64,
) -> DVec2
where
    I: IntoIterator<Item = &'a Mass>,
{
    let gradient = sources
        .into_iter()
        .chain(pointer)
        .fold(DVec2::ZERO, |acc, m| {
            acc + potential_gradient(point, m.position, m.strength, m.softening)
        });
    saturate(gradient * DISPLACEMENT_SCALE, max_displacement)
}

/// Squashes a raw displacement so its length stays strictly below `max_displacement`.
pub fn saturate(raw: DVec2, max_displacement: f64) -> DVec2 {
    let magnitude = raw.length();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return DVec2::ZERO;
    }
    let limited = (max_displacement * (magnitude / max_displacement).tanh())
        .min(max_displacement * SATURATION_CEILING);
    raw * (limited / magnitude)
}
