//! Bearer-token HTTP helper and guarded text cleaning.
//!
//! # Overview
//! Two independent, stateless pieces:
//! - `issue_request` builds a request from `RequestOptions`, adds an
//!   `Authorization: Bearer` header when asked to, sends it through a
//!   `Transport` and fails on any status of 400 or above.
//! - `normalize_whitespace` and `strip_special_characters` clean text behind
//!   a shared guard that accepts text or an absent value and rejects
//!   anything else.
//!
//! # Design
//! - Request building and status checking are pure; only `Transport::send`
//!   does I/O, so the helper is tested against stub transports.
//! - `UreqTransport` is the default transport. Keeping one around and passing
//!   it to every call reuses its connection pool.
//! - Nothing is retried and nothing is cached beyond the process-wide
//!   whitespace pattern.

pub mod client;
pub mod error;
pub mod guard;
pub mod http;
pub mod text;
pub mod transport;

pub use client::{
    build_request, check_status, issue_request, RequestOptions, DEFAULT_TIMEOUT,
};
pub use error::{RequestError, TextError, TransportError};
pub use guard::{guard, Guarded, TextValue};
pub use http::{HttpRequest, HttpResponse, Transport};
pub use text::{
    normalize_whitespace, strip_special_characters, NORMALIZE_WHITESPACE, STRIP_SPECIAL_CHARACTERS,
};
pub use transport::UreqTransport;
