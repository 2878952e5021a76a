//! Error types for the MathKit engines.
//!
//! Almost every engine operation is total. The variants here cover the few
//! places where a caller can hand an engine something it cannot act on, plus
//! configuration loading.

use std::path::PathBuf;

/// A specialized `Result` type for MathKit engine operations.
pub type Result<T> = std::result::Result<T, MathKitError>;

/// Errors that can occur in the MathKit engines.
#[derive(Debug, thiserror::Error)]
pub enum MathKitError {
    // ========================================================================
    // Engine Errors
    // ========================================================================
    /// A pipeline index did not refer to an existing slot.
    #[error("Pipeline index {index} is out of range for a pipeline of length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Length of the pipeline at the time of the call.
        len: usize,
    },

    /// A number line move landed outside the drawn line.
    #[error("Out of bounds! Position {position} is outside [{min}, {max}]\n\nSuggestion: Please try a different move")]
    OutOfBounds {
        /// The rejected position.
        position: i32,
        /// Lowest position on the line.
        min: i32,
        /// Highest position on the line.
        max: i32,
    },

    /// A place-value tier name was not recognised.
    #[error("Unknown place-value tier '{name}'\n\nSuggestion: Use one of 'ones', 'tens', 'hundreds', 'thousands'")]
    InvalidTier {
        /// The name that failed to parse.
        name: String,
    },

    /// A molecule name was not recognised.
    #[error("Unknown molecule '{name}'\n\nSuggestion: Use one of 'H2', 'O2', 'H2O'")]
    InvalidMolecule {
        /// The name that failed to parse.
        name: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your mathkit.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MathKitError {
    /// Creates a new `IndexOutOfRange` error.
    #[must_use]
    pub const fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Creates a new `OutOfBounds` error.
    #[must_use]
    pub const fn out_of_bounds(position: i32, min: i32, max: i32) -> Self {
        Self::OutOfBounds { position, min, max }
    }

    /// Creates a new `InvalidTier` error.
    #[must_use]
    pub fn invalid_tier(name: impl Into<String>) -> Self {
        Self::InvalidTier { name: name.into() }
    }

    /// Creates a new `InvalidMolecule` error.
    #[must_use]
    pub fn invalid_molecule(name: impl Into<String>) -> Self {
        Self::InvalidMolecule { name: name.into() }
    }

    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Returns `true` if the error came from user input to an engine rather
    /// than from the environment.
    ///
    /// Input errors are shown to the learner and the widget keeps going.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::IndexOutOfRange { .. }
                | Self::OutOfBounds { .. }
                | Self::InvalidTier { .. }
                | Self::InvalidMolecule { .. }
        )
    }
}
