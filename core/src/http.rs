//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `build_request` produces an
//! `HttpRequest` without touching the network and the `Transport` trait is
//! the only place I/O happens, so the helper can be exercised against a stub
//! transport in tests and against `UreqTransport` in production.
//!
//! All fields use owned types (`String`, `Vec`) so a request can be inspected
//! after it was dispatched.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::TransportError;

/// An HTTP request described as plain data.
///
/// Built by `build_request`. `method` is already upper-case and `headers`
/// already carry the derived `Authorization` entry, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// First header whose name matches `name` exactly.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Case-insensitive header lookup, as HTTP header names are.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Executes an `HttpRequest` and returns whatever the server answered.
///
/// Implementations must return error statuses as `Ok` responses; turning a
/// status of 400 or above into an error is the helper's job. A transport
/// that keeps state across calls (pooled connections) is a reusable
/// connection context: the caller owns it and passes it to every
/// `issue_request` that should share it.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}
