//! Error types for wallet-core
//!
//! Provides a unified error type shared by the wallet facade and every
//! storage backend.

use thiserror::Error;

/// Result type alias for wallet-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for wallet operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed construction parameters
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or empty entry name
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Value is neither text nor a byte sequence
    #[error("{0}")]
    UnsupportedValueType(String),

    /// Entry or object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend rejected the credentials or denied access
    #[error("Access denied: {0}")]
    Auth(String),

    /// Any other backend or transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Whether this error is the backend's not-found signal
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub(crate) fn unsupported_value() -> Self {
        Error::UnsupportedValueType("Unknown type being stored".into())
    }
}
