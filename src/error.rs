//! Error types for the archiver.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the archiver.
#[derive(Error, Debug)]
pub enum Error {
    // Resolution errors
    #[error("playlist group {url} mixes playlist and video children; refusing to guess")]
    MixedGroupComposition { url: String },

    #[error("no corrected URL available for broken group URL: {0}")]
    BrokenUrlUnresolved(String),

    // Collaborator errors
    #[error("info lookup failed for {url}: {message}")]
    InfoLookup { url: String, message: String },

    #[error("yt-dlp executable not found. Install it or put it on PATH")]
    YtDlpNotFound,

    // File system errors
    #[error("Invalid catalog file: {0}")]
    InvalidCatalogFile(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}

impl From<crate::services::ytdlp::ProviderError> for Error {
    fn from(err: crate::services::ytdlp::ProviderError) -> Self {
        use crate::services::ytdlp::ProviderError;
        match err {
            ProviderError::Download { url, message } => Error::InfoLookup { url, message },
            ProviderError::Parse { url, message } => Error::InfoLookup { url, message },
            ProviderError::BinaryNotFound(_) => Error::YtDlpNotFound,
            ProviderError::Io(err) => Error::Io(err),
        }
    }
}
