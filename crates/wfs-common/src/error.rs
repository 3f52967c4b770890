//! Error types for WFS client operations.

use thiserror::Error;

/// Result type alias using WfsError.
pub type WfsResult<T> = Result<T, WfsError>;

/// Primary error type for WFS operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WfsError {
    // === Transport Errors ===
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    // === Document Errors ===
    #[error("Unable to parse response: {0}")]
    Parse(String),

    #[error("Schema response describes '{found}', expected '{expected}'")]
    SchemaMismatch { expected: String, found: String },

    // === Temporal Lookup Errors ===
    #[error("Unable to find value of expected field: {0}. This is likely a result of layer having no records.")]
    FieldNotFound(String),

    #[error("Unable to find field '{field}' qualified with workspace '{workspace}' in GetFeature response")]
    PrefixMismatch { field: String, workspace: String },

    // === Configuration Errors ===
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl WfsError {
    /// Short category name, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            WfsError::Transport(_) => "transport",
            WfsError::EmptyResponse(_) => "empty_response",
            WfsError::Parse(_) => "parse",
            WfsError::SchemaMismatch { .. } => "schema_mismatch",
            WfsError::FieldNotFound(_) => "field_not_found",
            WfsError::PrefixMismatch { .. } => "prefix_mismatch",
            WfsError::Config(_) => "config",
        }
    }

    /// Whether this error means the layer simply holds no records.
    pub fn is_no_data(&self) -> bool {
        matches!(self, WfsError::FieldNotFound(_))
    }
}

impl From<serde_json::Error> for WfsError {
    fn from(err: serde_json::Error) -> Self {
        WfsError::Parse(format!("JSON error: {}", err))
    }
}
