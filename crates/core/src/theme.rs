//! Light/dark theme resolution and the per-theme render [`Config`].
//!
//! The host owns the toggle button, the stored preference and the
//! `prefers-color-scheme` media query. It reports those through
//! [`ThemeState`], and every change to the resolved theme swaps in a freshly
//! derived `Config`. Nothing mutates a `Config` in place.

use crate::color::Rgba;
use crate::error::SpacetimeError;
use crate::params::{param_color, param_f64};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Color scheme of the hosting page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn opposite(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = SpacetimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(SpacetimeError::UnknownTheme(s.to_string())),
        }
    }
}

/// Smallest lattice spacing a config may set, in logical pixels.
pub const MIN_GRID_SPACING: f64 = 1.0;

/// Everything the renderer and the field need that depends on the theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Lattice spacing in logical pixels.
    pub grid_spacing: f64,
    pub grid_line_width: f64,
    pub grid_color: Rgba,
    pub node_radius: f64,
    pub node_color: Rgba,
    pub node_ring_color: Rgba,
    pub node_ring_width: f64,
    /// Ring radius as a multiple of `node_radius`.
    pub node_ring_scale: f64,
    /// Strength of the pointer mass.
    pub cursor_mass: f64,
    /// Base strength of a navigator mass, scaled by each navigator's weight.
    pub autonomous_mass: f64,
    pub softening_length: f64,
    /// Upper bound (exclusive) on any point's displacement.
    pub max_displacement: f64,
    /// Backdrop used by headless surfaces; the browser page paints its own.
    pub background: Rgba,
}

/// Pure theme to config mapping.
pub fn derive_config(theme: Theme) -> Config {
    let light = theme == Theme::Light;
    let ink = |a: f64| {
        if light {
            Rgba::from_rgb8(0, 0, 0, a)
        } else {
            Rgba::from_rgb8(255, 255, 255, a)
        }
    };
    Config {
        grid_spacing: 40.0,
        grid_line_width: if light { 1.0 } else { 0.8 },
        grid_color: ink(0.1),
        node_radius: 3.0,
        node_color: ink(if light { 0.5 } else { 0.4 }),
        node_ring_color: ink(if light { 0.2 } else { 0.15 }),
        node_ring_width: 0.6,
        node_ring_scale: 2.2,
        cursor_mass: 70.0,
        autonomous_mass: 50.0,
        softening_length: 35.0,
        max_displacement: 18.0,
        background: if light {
            Rgba::WHITE
        } else {
            Rgba::from_rgb8(10, 10, 10, 1.0)
        },
    }
}

impl Config {
    /// Returns a copy with values from a JSON override object applied and validated.
    ///
    /// Keys match the field names; unknown keys are ignored.
    pub fn with_overrides(&self, params: &Value) -> Result<Config, SpacetimeError> {
        let config = Config {
            grid_spacing: param_f64(params, "grid_spacing", self.grid_spacing),
            grid_line_width: param_f64(params, "grid_line_width", self.grid_line_width),
            grid_color: param_color(params, "grid_color", self.grid_color),
            node_radius: param_f64(params, "node_radius", self.node_radius),
            node_color: param_color(params, "node_color", self.node_color),
            node_ring_color: param_color(params, "node_ring_color", self.node_ring_color),
            node_ring_width: param_f64(params, "node_ring_width", self.node_ring_width),
            node_ring_scale: param_f64(params, "node_ring_scale", self.node_ring_scale),
            cursor_mass: param_f64(params, "cursor_mass", self.cursor_mass),
            autonomous_mass: param_f64(params, "autonomous_mass", self.autonomous_mass),
            softening_length: param_f64(params, "softening_length", self.softening_length),
            max_displacement: param_f64(params, "max_displacement", self.max_displacement),
            background: param_color(params, "background", self.background),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the constraints the field math and lattice rely on.
    ///
    /// Spacing must be at least [`MIN_GRID_SPACING`]; softening, max
    /// displacement and node radius must be strictly positive; widths and
    /// masses must be finite and non-negative.
    pub fn validate(&self) -> Result<(), SpacetimeError> {
        if !(self.grid_spacing.is_finite() && self.grid_spacing >= MIN_GRID_SPACING) {
            return Err(SpacetimeError::InvalidConfig(format!(
                "grid_spacing must be finite and >= {MIN_GRID_SPACING}, got {}",
                self.grid_spacing
            )));
        }
        let positive = [
            ("softening_length", self.softening_length),
            ("max_displacement", self.max_displacement),
            ("node_radius", self.node_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SpacetimeError::InvalidConfig(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        let non_negative = [
            ("grid_line_width", self.grid_line_width),
            ("node_ring_width", self.node_ring_width),
            ("node_ring_scale", self.node_ring_scale),
            ("cursor_mass", self.cursor_mass),
            ("autonomous_mass", self.autonomous_mass),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SpacetimeError::InvalidConfig(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Theme inputs reported by the host: an explicit stored choice, if any, and
/// the system color-scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemeState {
    stored: Option<Theme>,
    system_prefers_light: bool,
}

impl ThemeState {
    pub fn new(stored: Option<Theme>, system_prefers_light: bool) -> Self {
        Self {
            stored,
            system_prefers_light,
        }
    }

    /// The stored theme wins; otherwise the system preference decides.
    pub fn resolved(&self) -> Theme {
        match self.stored {
            Some(theme) => theme,
            None if self.system_prefers_light => Theme::Light,
            None => Theme::Dark,
        }
    }

    pub fn stored(&self) -> Option<Theme> {
        self.stored
    }

    /// Sets or clears the explicit theme. Returns whether the resolved theme changed.
    pub fn set_stored(&mut self, stored: Option<Theme>) -> bool {
        let before = self.resolved();
        self.stored = stored;
        before != self.resolved()
    }

    /// Records a system preference change. Only affects the resolved theme
    /// while nothing is stored. Returns whether the resolved theme changed.
    pub fn set_system_prefers_light(&mut self, prefers_light: bool) -> bool {
        let before = self.resolved();
        self.system_prefers_light = prefers_light;
        before != self.resolved()
    }

    /// Stores the opposite of the current resolved theme and returns it.
    pub fn toggle(&mut self) -> Theme {
        let next = self.resolved().opposite();
        self.stored = Some(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn light_config_matches_reference_values() {
        let c = derive_config(Theme::Light);
        assert_eq!(c.grid_spacing, 40.0);
        assert_eq!(c.grid_line_width, 1.0);
        assert_eq!(c.grid_color.to_css(), "rgba(0, 0, 0, 0.1)");
        assert_eq!(c.node_color.to_css(), "rgba(0, 0, 0, 0.5)");
        assert_eq!(c.node_ring_color.to_css(), "rgba(0, 0, 0, 0.2)");
        assert_eq!(c.cursor_mass, 70.0);
        assert_eq!(c.autonomous_mass, 50.0);
        assert_eq!(c.softening_length, 35.0);
        assert_eq!(c.max_displacement, 18.0);
    }

    #[test]
    fn dark_config_matches_reference_values() {
        let c = derive_config(Theme::Dark);
        assert_eq!(c.grid_line_width, 0.8);
        assert_eq!(c.grid_color.to_css(), "rgba(255, 255, 255, 0.1)");
        assert_eq!(c.node_color.to_css(), "rgba(255, 255, 255, 0.4)");
        assert_eq!(c.node_ring_color.to_css(), "rgba(255, 255, 255, 0.15)");
    }

    #[test]
    fn derived_configs_are_valid() {
        for theme in Theme::ALL {
            derive_config(theme).validate().unwrap();
        }
    }

    #[test]
    fn theme_parses_case_insensitively() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(" dark ".parse::<Theme>().unwrap(), Theme::Dark);
        assert!(matches!(
            "sepia".parse::<Theme>(),
            Err(SpacetimeError::UnknownTheme(_))
        ));
    }

    #[test]
    fn overrides_apply_and_keep_the_rest() {
        let base = derive_config(Theme::Dark);
        let c = base
            .with_overrides(&json!({"grid_spacing": 32, "grid_color": "#ff0000"}))
            .unwrap();
        assert_eq!(c.grid_spacing, 32.0);
        assert_eq!(c.grid_color.to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(c.softening_length, base.softening_length);
    }

    #[test]
    fn overrides_reject_non_positive_softening() {
        let base = derive_config(Theme::Light);
        let err = base
            .with_overrides(&json!({"softening_length": 0.0}))
            .unwrap_err();
        assert!(err.to_string().contains("softening_length"), "{err}");
    }

    #[test]
    fn overrides_reject_sub_pixel_spacing() {
        let base = derive_config(Theme::Dark);
        for spacing in [1e-300, 0.01, 0.5] {
            let err = base
                .with_overrides(&json!({ "grid_spacing": spacing }))
                .unwrap_err();
            assert!(matches!(err, SpacetimeError::InvalidConfig(_)));
            assert!(err.to_string().contains("grid_spacing"), "{err}");
        }
        assert!(base.with_overrides(&json!({"grid_spacing": 1})).is_ok());
    }

    #[test]
    fn overrides_reject_negative_mass() {
        let base = derive_config(Theme::Light);
        assert!(base.with_overrides(&json!({"cursor_mass": -1})).is_err());
    }

    #[test]
    fn stored_theme_beats_system_preference() {
        let state = ThemeState::new(Some(Theme::Dark), true);
        assert_eq!(state.resolved(), Theme::Dark);
    }

    #[test]
    fn system_preference_applies_without_stored_theme() {
        let mut state = ThemeState::new(None, false);
        assert_eq!(state.resolved(), Theme::Dark);
        assert!(state.set_system_prefers_light(true));
        assert_eq!(state.resolved(), Theme::Light);
    }

    #[test]
    fn system_preference_ignored_while_theme_stored() {
        let mut state = ThemeState::new(Some(Theme::Light), true);
        assert!(!state.set_system_prefers_light(false));
        assert_eq!(state.resolved(), Theme::Light);
        // Clearing the stored theme falls back to the (now dark) system preference.
        assert!(state.set_stored(None));
        assert_eq!(state.resolved(), Theme::Dark);
    }

    #[test]
    fn set_stored_reports_no_change_for_same_theme() {
        let mut state = ThemeState::new(None, true);
        assert!(!state.set_stored(Some(Theme::Light)));
        assert_eq!(state.stored(), Some(Theme::Light));
    }

    #[test]
    fn toggle_flips_and_stores() {
        let mut state = ThemeState::new(None, true);
        assert_eq!(state.toggle(), Theme::Dark);
        assert_eq!(state.stored(), Some(Theme::Dark));
        assert_eq!(state.toggle(), Theme::Light);
    }

    #[test]
    fn config_json_round_trip() {
        let c = derive_config(Theme::Light);
        let json = serde_json::to_string(&c).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.grid_color.to_rgba8(), c.grid_color.to_rgba8());
        assert_eq!(back.max_displacement, c.max_displacement);
    }
}
