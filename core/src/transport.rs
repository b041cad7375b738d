//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the seam between the deterministic core and real I/O. The
//! container only ever talks to this trait, so tests can script responses
//! and other hosts can plug in their own HTTP stack. `UreqTransport` is the
//! blocking implementation used by the CLI and the live integration tests.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round trip.
///
/// Non-2xx statuses are data, not errors: only failures to obtain a response
/// at all map to `ApiError::Transport`.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        // Status interpretation belongs to `ItemClient`, so 4xx/5xx must come
        // back as responses.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
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
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::trace!(method = request.method.as_str(), path = %request.path, "sending request");

        let result = match (request.method, request.body) {
            (HttpMethod::Get, _) => {
                with_headers(self.agent.get(&request.path), &request.headers).call()
            }
            (HttpMethod::Delete, _) => {
                with_headers(self.agent.delete(&request.path), &request.headers).call()
            }
            (HttpMethod::Post, body) => {
                let builder = with_headers(self.agent.post(&request.path), &request.headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            (HttpMethod::Put, body) => {
                let builder = with_headers(self.agent.put(&request.path), &request.headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

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
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = decode_body(bytes)?;

        tracing::trace!(status, "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// A body that arrived intact but is not UTF-8 is a malformed payload, not a
/// failed round trip.
fn decode_body(bytes: Vec<u8>) -> Result<String, ApiError> {
    String::from_utf8(bytes).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
