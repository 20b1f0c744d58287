//! Error types for the serialization layer.

use std::fmt::Display;

/// Errors raised while encoding or decoding client models.
///
/// Decoding is all-or-nothing: when any of these is returned, no partial
/// value is handed back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or unexpected token while decoding.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A value could not be rendered as JSON.
    #[error("encode error: {message}")]
    Encode { message: String },

    /// Syntax error reported by the JSON reader.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A present input stream failed part-way through.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }

    /// Create an encode error.
    pub fn encode(message: impl Into<String>) -> Self {
        Error::Encode {
            message: message.into(),
        }
    }

    /// Whether this error came from the decode side (token or syntax problem).
    pub fn is_decode(&self) -> bool {
        match self {
            Error::Decode { .. } => true,
            Error::Json(e) => !e.is_io(),
            _ => false,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::encode(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::decode(msg.to_string())
    }
}

/// Result alias used throughout the serialization crates.
pub type Result<T, E = Error> = std::result::Result<T, E>;
