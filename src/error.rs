//! Error types shared by the surface, exporter and remote client.

use thiserror::Error;

/// Result type alias for MaskCanvas operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while uploading, drawing or exporting
#[derive(Error, Debug)]
pub enum Error {
    /// Selected file is not a JPEG or PNG image
    #[error("Please upload a valid JPEG or PNG file.")]
    InvalidFileType,

    /// The drawing surface has not been mounted yet
    #[error("Drawing surface is not ready")]
    SurfaceNotReady,

    /// Another export is still running
    #[error("An export is already in progress")]
    ExportInFlight,

    /// Request could not be sent or the connection failed
    #[error("Network error: {0}")]
    Network(String),

    /// The remote service answered with a non-success status
    #[error("Remote service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The remote service answered with a body we could not read
    #[error("Invalid response from remote service: {0}")]
    InvalidResponse(String),

    /// Image decode / encode failure
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// File I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::InvalidResponse(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}
