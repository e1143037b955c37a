//! Error types for the server and the map client.

use thiserror::Error;

/// Failures of the STDIO transport itself.
///
/// Anything that goes wrong inside a request is answered on the wire; only
/// these end the read loop.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Map client setup failed: {0}")]
    Map(#[from] MapError),
}

/// Failures of a single call to the map endpoint.
///
/// The `Display` text is shown to the caller verbatim as the tool error.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Network error calling map API: {0}")]
    Network(String),
    #[error("Error reading API response: {0}")]
    Read(String),
    #[error("Error parsing API response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Error creating map: {0}")]
    Rejected(String),
}
