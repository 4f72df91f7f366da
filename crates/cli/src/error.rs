//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: core error (bad dimensions, invalid config overrides)
//! - 11: I/O error (scene file read, PNG write)
//! - 12: input error (bad theme name, bad JSON, bad pointer or fps)
//! - 13: serialization error

use spacetime_core::SpacetimeError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A core error (bad dimensions, config overrides that fail validation).
    Core(SpacetimeError),
    /// An I/O error (scene file read, PNG write).
    Io(String),
    /// A user input error (bad theme name, malformed JSON, bad pointer or fps).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Core(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<SpacetimeError> for CliError {
    fn from(e: SpacetimeError) -> Self {
        match e {
            SpacetimeError::Io(msg) => CliError::Io(msg),
            SpacetimeError::UnknownTheme(_) => CliError::Input(e.to_string()),
            other => CliError::Core(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
