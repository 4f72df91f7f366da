//! Error types for the spacetime core.
//!
//! Nothing on the per-frame path returns an error. These cover construction
//! and configuration: viewport sizes, config overrides, color strings, theme
//! names, and snapshot I/O surfaced through the same type.

use thiserror::Error;

/// Errors produced while building or configuring a simulation.
#[derive(Debug, Error)]
pub enum SpacetimeError {
    /// Width or height was zero, non-finite, or overflowed a pixel buffer.
    #[error("invalid dimensions: width and height must be positive and finite")]
    InvalidDimensions,

    /// A config value broke one of its constraints (e.g. non-positive softening).
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A theme name other than `light` or `dark`.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// Writing a snapshot or reading a scene file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = SpacetimeError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_config_includes_reason() {
        let msg = SpacetimeError::InvalidConfig("softening_length must be > 0".into()).to_string();
        assert!(msg.contains("softening_length"), "missing reason in: {msg}");
    }

    #[test]
    fn invalid_color_includes_input() {
        let msg = SpacetimeError::InvalidColor("rgba(1, 2)".into()).to_string();
        assert!(msg.contains("rgba(1, 2)"), "missing input in: {msg}");
    }

    #[test]
    fn unknown_theme_includes_name() {
        let msg = SpacetimeError::UnknownTheme("sepia".into()).to_string();
        assert!(msg.contains("sepia"), "missing theme name in: {msg}");
    }

    #[test]
    fn io_includes_message() {
        let msg = SpacetimeError::Io("disk full".into()).to_string();
        assert!(msg.contains("disk full"), "missing message in: {msg}");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SpacetimeError>();
    }

    #[test]
    fn error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<SpacetimeError>();
    }
}
