//! Domain error types
//!
//! This module defines the error hierarchy for elastictl. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main elastictl error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ElastictlError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Export pipeline errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Export pipeline errors
///
/// Every variant is fatal to the export and is never retried. These errors
/// don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A request could not be issued or no response arrived
    #[error("Search backend unreachable: {0}")]
    BackendUnreachable(String),

    /// The response body was unreadable, unparsable or not a success
    #[error("Malformed response from search backend: {0}")]
    MalformedResponse(String),

    /// The first page carried no total hit count
    #[error("Search response has no hits.total")]
    MissingTotal,

    /// A page carried no well-formed hit sequence
    #[error("Search response has no hits.hits array: {0}")]
    MissingHits(String),

    /// Writing a record to the output failed
    #[error("Failed to write record: {0}")]
    SinkWriteFailed(String),
}

impl ExportError {
    /// Short, stable name of the error kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            ExportError::BackendUnreachable(_) => "backend_unreachable",
            ExportError::MalformedResponse(_) => "malformed_response",
            ExportError::MissingTotal => "missing_total",
            ExportError::MissingHits(_) => "missing_hits",
            ExportError::SinkWriteFailed(_) => "sink_write_failed",
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ElastictlError {
    fn from(err: std::io::Error) -> Self {
        ElastictlError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ElastictlError {
    fn from(err: serde_json::Error) -> Self {
        ElastictlError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ElastictlError {
    fn from(err: toml::de::Error) -> Self {
        ElastictlError::Configuration(format!("TOML parse error: {err}"))
    }
}
