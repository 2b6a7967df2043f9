//! Blocking `Transport` backed by `ureq`.

use std::fmt;
use std::time::Duration;

use ureq::http;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};

/// Default transport used by `TikaClient::new`.
///
/// Status codes are returned as data (`http_status_as_error(false)`), and
/// the body size limit is lifted because extracted text can be large.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// `timeout` bounds the whole round-trip; `None` waits indefinitely.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let result = match &request.body {
            Some(body) => builder
                .body(body.clone())
                .map_err(|e| TransportError::with_source("building request", e))
                .and_then(|req| self.agent.run(req).map_err(send_error)),
            None => builder
                .body(())
                .map_err(|e| TransportError::with_source("building request", e))
                .and_then(|req| self.agent.run(req).map_err(send_error)),
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| TransportError::with_source("reading response body", e))?;

        Ok(HttpResponse { status, body })
    }
}

fn send_error(err: ureq::Error) -> TransportError {
    TransportError::with_source("sending request", err)
}
