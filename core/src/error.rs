//! Error types for parsing and definition loading.

use std::fmt;

use thiserror::Error;

use crate::DefinitionError;

/// Element whose value is missing after a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// Option display name (e.g. `--file`).
    Option(String),
    /// Argument label (e.g. `foo`).
    Argument(String),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Option(name) => write!(f, "option '{name}'"),
            Self::Argument(label) => write!(f, "argument <{label}>"),
        }
    }
}

/// Errors raised by [`Parser::parse`](crate::Parser::parse).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A required option or argument has no value, or a value-bearing option
    /// was the last token.
    #[error("missing value for {0}")]
    MissingValue(Missing),

    /// An option value is not one of its declared choices.
    #[error("invalid value '{value}' for option '{option}'")]
    InvalidValue { option: String, value: String },

    /// The command definition is inconsistent.
    #[error("invalid command definition: {0}")]
    Definition(#[from] DefinitionError),
}

/// Errors that can occur while loading or saving definition files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The definition deserialized but is inconsistent.
    #[error("invalid command definition: {0}")]
    Invalid(#[from] DefinitionError),
}

/// Convenience alias for results with [`LoadError`].
pub type Result<T> = std::result::Result<T, LoadError>;
