//! Error types for rule parsing and advisor configuration
//!
//! Parsers fail fast with a positioned error. Runtime checks never fail:
//! unsupported conditions and inexact apertures are soft outcomes recorded
//! in the report instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrcError {
    /// Malformed S-expression input
    #[error("parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Malformed project-file JSON
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Json {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("unknown constraint type: {0}")]
    UnknownConstraint(String),

    /// A numeric constraint value that could not be read
    #[error("invalid value '{value}': {message}")]
    InvalidValue { value: String, message: String },

    /// Missing or inconsistent caller-supplied setup
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DrcError {
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        DrcError::Parse {
            position,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        DrcError::Configuration(message.into())
    }
}

impl From<serde_json::Error> for DrcError {
    fn from(err: serde_json::Error) -> Self {
        DrcError::Json {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DrcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_carries_position() {
        let err = DrcError::parse(17, "Expected ')'");
        assert_eq!(err.to_string(), "parse error at position 17: Expected ')'");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: DrcError = serde_json::from_str::<serde_json::Value>("{\"a\": }")
            .unwrap_err()
            .into();
        match err {
            DrcError::Json { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
