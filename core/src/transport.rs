//! The I/O seam: something that turns an `HttpRequest` into an `HttpResponse`.
//!
//! # Design
//! Transports return non-2xx responses as data; interpreting the status is
//! the core's job (`ShopClient::parse_*`). Only failures that produce no
//! response at all come back as `ApiError::Transport`. Timeouts and
//! cancellation belong to the transport.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP round-trip. No retries.
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
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            path,
            query,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get => {
                let mut req = self.agent.get(&path);
                for (k, v) in &query {
                    req = req.query(k, v);
                }
                for (k, v) in &headers {
                    req = req.header(k, v);
                }
                req.call()
            }
            HttpMethod::Delete => {
                let mut req = self.agent.delete(&path);
                for (k, v) in &query {
                    req = req.query(k, v);
                }
                for (k, v) in &headers {
                    req = req.header(k, v);
                }
                req.call()
            }
            HttpMethod::Post | HttpMethod::Patch => {
                let mut req = if method == HttpMethod::Post {
                    self.agent.post(&path)
                } else {
                    self.agent.patch(&path)
                };
                for (k, v) in &query {
                    req = req.query(k, v);
                }
                for (k, v) in &headers {
                    req = req.header(k, v);
                }
                match body {
                    Some(bytes) => req.send(&bytes[..]),
                    None => req.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
