//! Lenient readers for config overrides held in a `serde_json::Value` object.
//!
//! Each helper takes the override object, a key, and the current value. A
//! missing key or a value of the wrong JSON type leaves the current value in
//! place. Range checks happen afterwards in `Config::validate`.

use crate::color::Rgba;
use serde_json::Value;

/// Reads `params[name]` as `f64`, accepting integers too.
pub fn param_f64(params: &Value, name: &str, current: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(current)
}

/// Reads `params[name]` as a CSS color string.
///
/// An unparseable string also falls back to `current`, with a warning.
pub fn param_color(params: &Value, name: &str, current: Rgba) -> Rgba {
    let Some(raw) = params.get(name).and_then(Value::as_str) else {
        return current;
    };
    match Rgba::from_css(raw) {
        Ok(color) => color,
        Err(e) => {
            log::warn!("ignoring override for '{name}': {e}");
            current
        }
    }
}
