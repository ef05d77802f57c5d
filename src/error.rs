//! Error types for the table reconstruction library.
//!
//! This module defines all error types that can occur while talking to the
//! external table detector, parsing its payload, or configuring a stage.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during table reconstruction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The external detector process could not run or exited unsuccessfully
    #[error("Table detector '{program}' failed ({status}): {stderr}")]
    ExtractorFailed {
        /// Program that was invoked
        program: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// Detector payload is structurally valid JSON but lacks required geometry
    #[error("Malformed table payload: {0}")]
    MalformedPayload(String),

    /// Page number referenced that does not exist in the document
    #[error("Page {0} not found in document")]
    PageNotFound(u32),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
