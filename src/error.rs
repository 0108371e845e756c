//! Error types for page assembly and rendering

use thiserror::Error;

/// Result type alias for page operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or rendering a page
#[derive(Error, Debug)]
pub enum Error {
    /// The doctype could not be resolved against the doctype table
    #[error("Unsupported or illegal document type: \"{0}\"")]
    UnsupportedDoctype(String),

    /// Content supplied to the page cannot be rendered where it was placed
    #[error("Content error: {0}")]
    ContentError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Writing the response failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
