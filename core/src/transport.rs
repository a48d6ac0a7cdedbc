//! Default `Transport` backed by `ureq`.
//!
//! # Design
//! The agent is built with `http_status_as_error(false)` so 4xx/5xx
//! responses come back as data and `check_status` decides what is an error.
//! A `UreqTransport` kept around by the caller reuses the agent's connection
//! pool across calls; `issue_request` without a connection builds a fresh
//! one-shot agent per call.

use std::time::Duration;

use tracing::trace;
use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, RequestBuilder};

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Blocking transport over a `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
    /// Upper bound on every call; a request may only shorten it.
    timeout: Option<Duration>,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::from_agent(
            Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent(),
        )
    }

    /// Transport whose calls never run longer than `timeout`. A request
    /// with a shorter timeout of its own keeps the shorter one.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::new()
        }
    }

    /// Wrap an agent configured elsewhere. It must not have
    /// `http_status_as_error` enabled, or error statuses surface as
    /// transport failures instead of `HttpStatus` errors.
    pub fn from_agent(agent: Agent) -> Self {
        Self {
            agent,
            timeout: None,
        }
    }

    /// The shorter of the transport's bound and the request's own timeout.
    fn effective_timeout(&self, request: &HttpRequest) -> Duration {
        match self.timeout {
            Some(bound) => bound.min(request.timeout),
            None => request.timeout,
        }
    }

    fn without_body(
        &self,
        builder: RequestBuilder<WithoutBody>,
        request: &HttpRequest,
    ) -> Result<ureq::http::Response<ureq::Body>, TransportError> {
        let builder = decorate(builder, request, self.effective_timeout(request));
        match &request.body {
            Some(body) => {
                let payload = serde_json::to_string(body)?;
                Ok(builder
                    .force_send_body()
                    .content_type("application/json")
                    .send(payload.as_bytes())?)
            }
            None => Ok(builder.call()?),
        }
    }

    fn with_body(
        &self,
        builder: RequestBuilder<WithBody>,
        request: &HttpRequest,
    ) -> Result<ureq::http::Response<ureq::Body>, TransportError> {
        let builder = decorate(builder, request, self.effective_timeout(request));
        match &request.body {
            Some(body) => {
                let payload = serde_json::to_string(body)?;
                Ok(builder
                    .content_type("application/json")
                    .send(payload.as_bytes())?)
            }
            None => Ok(builder.send_empty()?),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let mut response = match request.method.as_str() {
            "GET" => self.without_body(self.agent.get(url), request)?,
            "DELETE" => self.without_body(self.agent.delete(url), request)?,
            "HEAD" => self.without_body(self.agent.head(url), request)?,
            "OPTIONS" => self.without_body(self.agent.options(url), request)?,
            "POST" => self.with_body(self.agent.post(url), request)?,
            "PUT" => self.with_body(self.agent.put(url), request)?,
            "PATCH" => self.with_body(self.agent.patch(url), request)?,
            other => return Err(TransportError::UnsupportedMethod(other.to_string())),
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = if request.method == "HEAD" {
            String::new()
        } else {
            response.body_mut().read_to_string()?
        };
        trace!(status, bytes = body.len(), "response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Apply headers, query pairs and the timeout for this call.
fn decorate<B>(
    mut builder: RequestBuilder<B>,
    request: &HttpRequest,
    timeout: Duration,
) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    builder
        .config()
        .timeout_global(Some(timeout))
        .build()
}
