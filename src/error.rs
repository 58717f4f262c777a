//! Error types for car-media
//!
//! Collaborators (scanner, store) report failures through this type.
//! The session coordinator never lets these escape to the UI: they are logged
//! and the session carries on in empty-state.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// File I/O errors (scanning, resume file)
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resume record could not be encoded or decoded
    #[error("Resume store error: {0}")]
    Store(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
