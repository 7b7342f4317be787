//! Authenticated `reqwest` transport used by the binary.

use std::time::Duration;

use log::debug;

use super::helpers::build_headers;
use super::types::Token;
use crate::api::executor::{HttpRequest, HttpResponse, RequestExecutor, ResponseBody};
use crate::error::TransportError;

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`RequestExecutor`] backed by a shared `reqwest::Client`.
///
/// Authentication and GitHub media-type headers are installed once as client
/// defaults, so every request sent through this executor carries them.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestExecutor {
    /// Create an executor authenticating with `token`.
    ///
    /// An empty token sends anonymous requests.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the authorization header cannot be
    /// constructed or the HTTP client fails to initialise.
    pub fn new(token: impl Into<Token>) -> Result<Self, TransportError> {
        Self::with_timeout(token, DEFAULT_TIMEOUT)
    }

    /// Create an executor with a custom request timeout.
    ///
    /// The timeout covers the whole exchange, including body streaming.
    ///
    /// # Errors
    ///
    /// See [`ReqwestExecutor::new`].
    pub fn with_timeout(token: impl Into<Token>, timeout: Duration) -> Result<Self, TransportError> {
        let headers = build_headers(&token.into())?;
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::new("build HTTP client", e))?;
        Ok(Self { client, timeout })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl RequestExecutor for ReqwestExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let context = format!("{method} {url}");
        let response = self
            .client
            .request(method, url.as_str())
            .headers(headers)
            .body(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TransportError::new(context.as_str(), e))?;
        debug!("{context}: status {}", response.status());
        let status = response.status();
        let headers = response.headers().clone();
        Ok(HttpResponse {
            status,
            headers,
            body: ResponseBody::from_stream(response.bytes_stream()),
        })
    }
}
