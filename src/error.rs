//! Error types for orbshell.
//!
//! Geometry and physics never fail: degenerate vectors fall back to a zero or
//! unit axis instead. The errors here cover caller input (shape names, counts,
//! configuration) and the host-side frame export used by the capture workflow.

use thiserror::Error;

/// Errors that can occur when configuring or driving a scene.
#[derive(Error, Debug)]
pub enum OrbError {
    /// A caller supplied an unknown shape name, a non-positive count or a bad radius.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The host frame sink refused or failed an export.
    #[error("frame capture failed: {0}")]
    Capture(String),
}

impl From<serde_json::Error> for OrbError {
    fn from(e: serde_json::Error) -> Self {
        OrbError::Config(e.to_string())
    }
}

/// Result alias used throughout the crate.
pub type OrbResult<T> = Result<T, OrbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let err = OrbError::InvalidArgument("unknown shape 'Pyramid'".into());
        assert_eq!(err.to_string(), "invalid argument: unknown shape 'Pyramid'");
    }

    #[test]
    fn test_json_error_becomes_config() {
        let parse = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err: OrbError = parse.into();
        assert!(matches!(err, OrbError::Config(_)));
    }
}
