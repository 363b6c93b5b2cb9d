//! Error types for the fatura-core library.

use thiserror::Error;

/// Error type for file and configuration handling.
///
/// The pipeline stages return their own [`RecordError`] and [`ContractError`].
#[derive(Error, Debug)]
pub enum FaturaError {
    /// JSON decoding or encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Structural failures raised when building a typed invoice record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A required top-level key is absent.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A party is not an object, or a collection is not an array.
    #[error("invalid shape for field: {0}")]
    InvalidShape(String),
}

impl RecordError {
    /// Name of the offending top-level field.
    pub fn field(&self) -> &str {
        match self {
            RecordError::MissingField(field) | RecordError::InvalidShape(field) => field,
        }
    }
}

/// Violations of the exact canonical payload shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// Expected an object at the given path.
    #[error("{path} must be an object")]
    NotAnObject { path: String },

    /// Expected an array at the given path.
    #[error("{path} must be an array")]
    NotAnArray { path: String },

    /// Object keys differ from the canonical key set.
    #[error("{path} keys invalid: expected [{expected}], found [{found}]")]
    Keys {
        path: String,
        expected: String,
        found: String,
    },

    /// A scalar slot has the wrong type.
    #[error("{path} must be {expected}")]
    Type { path: String, expected: &'static str },
}

/// Result type for the fatura library.
pub type Result<T> = std::result::Result<T, FaturaError>;
