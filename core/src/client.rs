//! Bearer-token request helper.
//!
//! # Design
//! `issue_request` is `build_request` followed by a `Transport::send` and
//! `check_status`. The first and last steps are pure, so everything except
//! the round-trip itself is testable without a network.

use std::fmt::Display;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::RequestError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::transport::UreqTransport;

/// Timeout applied when the caller does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const AUTHORIZATION: &str = "Authorization";

/// Everything `issue_request` needs to describe a call.
///
/// `method` and `url` are required; the rest default to empty, with a
/// timeout of `DEFAULT_TIMEOUT`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// HTTP method in any case; sent upper-cased.
    pub method: String,
    pub url: String,
    /// Query string pairs, sent in order.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<serde_json::Value>,
    /// Caller headers. Never modified by the helper. Duplicate names are
    /// sent as given, in order.
    pub headers: Vec<(String, String)>,
    /// Sent as `Authorization: Bearer <token>` unless the headers already
    /// contain an `Authorization` key. An empty token counts as no token.
    pub bearer_token: Option<String>,
    pub timeout: Duration,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            url: String::new(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
            bearer_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RequestOptions {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            ..Self::default()
        }
    }

    /// Append a query parameter; scalars are rendered with `Display`.
    pub fn query(mut self, key: &str, value: impl Display) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn bearer_token(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Derive the request that will actually be sent.
///
/// The caller's headers are copied, never mutated. The `Authorization` check
/// is case-sensitive on the literal key.
pub fn build_request(options: &RequestOptions) -> HttpRequest {
    let mut headers = options.headers.clone();
    if let Some(token) = options.bearer_token.as_deref().filter(|t| !t.is_empty()) {
        if !headers.iter().any(|(name, _)| name == AUTHORIZATION) {
            headers.push((AUTHORIZATION.to_string(), format!("Bearer {token}")));
        }
    }

    HttpRequest {
        method: options.method.to_uppercase(),
        url: options.url.clone(),
        query: options.query.clone(),
        headers,
        body: options.body.clone(),
        timeout: options.timeout,
    }
}

/// Map a status of 400 or above to `RequestError::HttpStatus`.
pub fn check_status(response: HttpResponse) -> Result<HttpResponse, RequestError> {
    if !response.is_error() {
        return Ok(response);
    }
    Err(RequestError::HttpStatus {
        status: response.status,
        response: Box::new(response),
    })
}

/// Send one request and fail on transport errors or error statuses.
///
/// Goes through `connection` when given, otherwise through a one-shot
/// `UreqTransport`. Nothing is retried.
pub fn issue_request(
    options: &RequestOptions,
    connection: Option<&dyn Transport>,
) -> Result<HttpResponse, RequestError> {
    let request = build_request(options);
    debug!(
        method = %request.method,
        url = %request.url,
        reused_connection = connection.is_some(),
        "dispatching request"
    );

    let response = match connection {
        Some(transport) => transport.send(&request)?,
        None => UreqTransport::new().send(&request)?,
    };
    debug!(status = response.status, url = %request.url, "response status");

    check_status(response).inspect_err(|err| {
        if let Some(status) = err.status() {
            warn!(status, method = %request.method, url = %request.url, "request failed");
        }
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::TransportError;

    /// Records every request and answers with a fixed response.
    struct StubTransport {
        seen: RefCell<Vec<HttpRequest>>,
        status: u16,
    }

    impl StubTransport {
        fn returning(status: u16) -> Self {
            Self {
                seen: RefCell::new(Vec::new()),
                status,
            }
        }

        fn last(&self) -> HttpRequest {
            self.seen.borrow().last().cloned().unwrap()
        }
    }

    impl Transport for StubTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: vec![("content-type".to_string(), "text/plain".to_string())],
                body: "stub body".to_string(),
            })
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(TransportError::UnsupportedMethod(request.method.clone()))
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let options = RequestOptions::new("get", "http://localhost:3000/items");
        assert_eq!(options.timeout, Duration::from_secs(15));
        assert!(options.query.is_empty());
        assert!(options.headers.is_empty());
        assert!(options.body.is_none());
        assert!(options.bearer_token.is_none());
    }

    #[test]
    fn method_is_upper_cased() {
        let req = build_request(&RequestOptions::new("pAtCh", "http://localhost"));
        assert_eq!(req.method, "PATCH");
    }

    #[test]
    fn bearer_token_is_injected_when_missing() {
        let stub = StubTransport::returning(200);
        let options = RequestOptions::new("get", "http://localhost/data").bearer_token("X");
        issue_request(&options, Some(&stub)).unwrap();
        assert_eq!(stub.last().header("Authorization"), Some("Bearer X"));
    }

    #[test]
    fn existing_authorization_header_is_not_overwritten() {
        let stub = StubTransport::returning(200);
        let options = RequestOptions::new("get", "http://localhost/data")
            .header("Authorization", "Basic abc")
            .bearer_token("X");
        issue_request(&options, Some(&stub)).unwrap();

        let sent = stub.last();
        let auth: Vec<_> = sent.headers.iter().filter(|(k, _)| k == "Authorization").collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(auth[0].1, "Basic abc");
    }

    #[test]
    fn authorization_check_is_case_sensitive() {
        let options = RequestOptions::new("get", "http://localhost")
            .header("authorization", "Basic abc")
            .bearer_token("X");
        let req = build_request(&options);
        assert_eq!(req.header("authorization"), Some("Basic abc"));
        assert_eq!(req.header("Authorization"), Some("Bearer X"));
    }

    #[test]
    fn empty_token_adds_no_header() {
        let req = build_request(&RequestOptions::new("get", "http://localhost").bearer_token(""));
        assert!(req.header("Authorization").is_none());
    }

    #[test]
    fn caller_headers_are_left_untouched() {
        let options = RequestOptions::new("post", "http://localhost")
            .header("X-Trace", "1")
            .bearer_token("X");
        let before = options.headers.clone();
        let req = build_request(&options);
        assert_eq!(options.headers, before);
        assert_eq!(req.headers.len(), 2);
    }

    #[test]
    fn duplicate_caller_headers_are_sent_as_given() {
        let options = RequestOptions::new("get", "http://localhost")
            .header("Accept", "text/plain")
            .header("Accept", "application/json");
        let req = build_request(&options);
        assert_eq!(
            req.headers,
            vec![
                ("Accept".to_string(), "text/plain".to_string()),
                ("Accept".to_string(), "application/json".to_string())
            ]
        );
    }

    #[test]
    fn query_body_and_timeout_are_forwarded() {
        let options = RequestOptions::new("post", "http://localhost/search")
            .query("page", 2)
            .query("q", "rust")
            .json(serde_json::json!({"limit": 10}))
            .timeout(Duration::from_millis(2500));
        let req = build_request(&options);
        assert_eq!(
            req.query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("q".to_string(), "rust".to_string())
            ]
        );
        assert_eq!(req.body, Some(serde_json::json!({"limit": 10})));
        assert_eq!(req.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn server_error_becomes_http_status_error() {
        let stub = StubTransport::returning(500);
        let options = RequestOptions::new("get", "http://localhost");
        let err = issue_request(&options, Some(&stub)).unwrap_err();
        match err {
            RequestError::HttpStatus { status, response } => {
                assert_eq!(status, 500);
                assert_eq!(response.body, "stub body");
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[test]
    fn client_error_threshold_is_400() {
        let options = RequestOptions::new("get", "http://localhost");
        let stub = StubTransport::returning(404);
        let err = issue_request(&options, Some(&stub)).unwrap_err();
        assert_eq!(err.status(), Some(404));

        let stub = StubTransport::returning(302);
        assert!(issue_request(&options, Some(&stub)).is_ok());
    }

    #[test]
    fn success_returns_response_unchanged() {
        let stub = StubTransport::returning(200);
        let options = RequestOptions::new("get", "http://localhost");
        let resp = issue_request(&options, Some(&stub)).unwrap();
        assert_eq!(
            resp,
            HttpResponse {
                status: 200,
                headers: vec![("content-type".to_string(), "text/plain".to_string())],
                body: "stub body".to_string(),
            }
        );
    }

    #[test]
    fn transport_failure_propagates_as_transport_error() {
        let options = RequestOptions::new("get", "http://localhost");
        let err = issue_request(&options, Some(&FailingTransport)).unwrap_err();
        assert!(matches!(
            err,
            RequestError::Transport(TransportError::UnsupportedMethod(_))
        ));
        assert!(err.status().is_none());
    }

    #[test]
    fn connection_is_reused_across_calls() {
        let stub = StubTransport::returning(200);
        let options = RequestOptions::new("get", "http://localhost");
        issue_request(&options, Some(&stub)).unwrap();
        issue_request(&options, Some(&stub)).unwrap();
        assert_eq!(stub.seen.borrow().len(), 2);
    }
}
