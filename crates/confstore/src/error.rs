//! Error types for loading and saving configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving a configuration document.
#[derive(Debug, Error)]
pub enum ConfStoreError {
    /// No provider in the group claims the path
    #[error("No provider accepts path: {path}")]
    NoProvider {
        /// Path that no provider recognised
        path: String,
    },

    /// Encoding or decoding failed
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Local file could not be opened, read, written, or its directory created
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// Filesystem path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// HTTP request could not be sent or its response could not be read
    #[error("Transport error for {url}: {source}")]
    Transport {
        /// URL being requested
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// HTTP response status outside of 2xx
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    /// Configuration file could not be read or parsed
    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config {
        /// Configuration file
        path: PathBuf,
        /// Parser message
        message: String,
    },
}

impl ConfStoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfStoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        ConfStoreError::Transport {
            url: url.into(),
            source,
        }
    }

    /// Whether this error is a transport failure caused by the client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ConfStoreError::Transport { source, .. } if source.is_timeout())
    }

    /// HTTP status code carried by a [`ConfStoreError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            ConfStoreError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors produced by a [`Codec`](crate::codec::Codec).
#[derive(Debug, Error)]
pub enum CodecError {
    /// Value could not be encoded in the codec's format
    #[error("failed to encode {format}: {message}")]
    Encode {
        /// Format name
        format: &'static str,
        /// Encoder message
        message: String,
    },

    /// Bytes could not be parsed in the codec's format
    #[error("failed to decode {format}: {message}")]
    Decode {
        /// Format name
        format: &'static str,
        /// Decoder message
        message: String,
    },

    /// Parsed document does not fit the requested type, or the value does not
    /// map to a document
    #[error("document does not match target type: {0}")]
    Convert(#[from] serde_json::Error),

    /// Text formats require UTF-8 input
    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Every codec of a group rejected the input
    #[error("no codec could {0} the value")]
    Exhausted(&'static str),

    /// Codec group has no members
    #[error("codec group is empty")]
    Empty,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfStoreError>;
