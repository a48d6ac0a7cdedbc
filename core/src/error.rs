//! Error types for the request helper and the text cleaner.
//!
//! # Design
//! The two halves of the crate fail in unrelated ways, so each gets its own
//! enum. `RequestError` separates "the request never completed"
//! (`Transport`) from "the server answered with an error status"
//! (`HttpStatus`); the latter keeps the whole response so callers can still
//! read the body.

use crate::http::HttpResponse;

/// Errors returned by the guarded text transformations.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The guard received a value that is neither text nor absent.
    #[error("expected text or absent value, received {received:?}")]
    Type { received: &'static str },

    /// The character filter pattern could not be compiled.
    #[error("invalid filter pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Failures raised by a `Transport` before a response was obtained.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout, TLS and similar.
    #[error(transparent)]
    Ureq(#[from] ureq::Error),

    /// The default transport has no builder for this method.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The JSON body could not be serialized.
    #[error("request body serialization failed: {0}")]
    Body(#[from] serde_json::Error),
}

/// Errors returned by `issue_request`.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The server returned a status code of 400 or above.
    #[error("HTTP {status}: {}", response.body)]
    HttpStatus {
        status: u16,
        response: Box<HttpResponse>,
    },
}

impl RequestError {
    /// Status code of an `HttpStatus` error, `None` for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::HttpStatus { status, .. } => Some(*status),
            RequestError::Transport(_) => None,
        }
    }
}
