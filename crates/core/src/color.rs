//! RGBA colors as the canvas sees them.
//!
//! Theme colors are translucent strokes and fills (`rgba(0, 0, 0, 0.1)` and
//! friends), so the color type carries alpha and round-trips through CSS
//! color strings. Components are stored as `f64` in [0, 1].

use crate::error::SpacetimeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Straight (non-premultiplied) RGBA color with components in [0, 1].
///
/// Serializes as a CSS `rgba(r, g, b, a)` string. Channels are quantized to
/// 8 bits on output; alpha keeps up to three decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from 8-bit channels and a [0, 1] alpha.
    pub fn from_rgb8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// 8-bit RGBA channels, rounded and clamped.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Parses `rgba(r, g, b, a)`, `rgb(r, g, b)`, `#rrggbb` or `#rrggbbaa`.
    ///
    /// Functional notation takes 0–255 channels and a 0–1 alpha.
    pub fn from_css(input: &str) -> Result<Rgba, SpacetimeError> {
        let s = input.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| SpacetimeError::InvalidColor(input.to_string()));
        }
        let lower = s.to_ascii_lowercase();
        let (args, with_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(SpacetimeError::InvalidColor(input.to_string()));
        };
        let args = args
            .strip_suffix(')')
            .ok_or_else(|| SpacetimeError::InvalidColor(input.to_string()))?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(SpacetimeError::InvalidColor(format!(
                "{input}: expected {expected} components, got {}",
                parts.len()
            )));
        }
        let channel = |p: &str| -> Result<u8, SpacetimeError> {
            p.parse::<u8>()
                .map_err(|e| SpacetimeError::InvalidColor(format!("{input}: bad channel '{p}': {e}")))
        };
        let alpha = if with_alpha {
            let a: f64 = parts[3]
                .parse()
                .map_err(|e| SpacetimeError::InvalidColor(format!("{input}: bad alpha: {e}")))?;
            if !(0.0..=1.0).contains(&a) {
                return Err(SpacetimeError::InvalidColor(format!(
                    "{input}: alpha {a} outside [0, 1]"
                )));
            }
            a
        } else {
            1.0
        };
        Ok(Rgba::from_rgb8(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }

    /// CSS `rgba(r, g, b, a)` string, the form a 2D canvas context accepts.
    pub fn to_css(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        let a = (self.a.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
        format!("rgba({r}, {g}, {b}, {a})")
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if hex.len() != 6 && hex.len() != 8 {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    let alpha = if hex.len() == 8 {
        byte(6)? as f64 / 255.0
    } else {
        1.0
    };
    Some(Rgba::from_rgb8(byte(0)?, byte(2)?, byte(4)?, alpha))
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_css(&s).map_err(serde::de::Error::custom)
    }
}
