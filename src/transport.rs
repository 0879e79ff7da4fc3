//! HTTP transport seam.
//!
//! Everything that leaves the process goes through a [`Transport`]. The
//! production implementation wraps a `reqwest` client; tests can script
//! responses without a socket.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{JiraError, Result};

const USER_AGENT: &str = concat!("jira-mcp/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// A single outbound HTTP request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

/// A completed HTTP response with its body already read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl ApiResponse {
    /// Create a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response body as text.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Decode the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Parse`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            debug!(
                content_type = ?self.headers.get(header::CONTENT_TYPE),
                "response body is not the expected JSON"
            );
            JiraError::Parse(e)
        })
    }

    /// Turn a non-success response into [`JiraError::Upstream`].
    ///
    /// `context` names the failed request in the error message.
    ///
    /// # Errors
    ///
    /// Returns the upstream error when the status is outside 2xx.
    pub fn error_for_status(self, context: impl Into<String>) -> Result<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(JiraError::Upstream {
                context: context.into(),
                status: self.status.as_u16(),
                body: self.body,
            })
        }
    }
}

/// Sends one HTTP request and reads the full response.
///
/// Implementations must not retry; that is the executor's job.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Transport`] when no HTTP response was received
    /// and [`JiraError::Body`] when the status arrived but the body did not.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// `reqwest`-backed transport.
///
/// Cheaply cloneable; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Build the transport with the default user agent and timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(JiraError::Body)?;

        Ok(ApiResponse::new(status, headers, body))
    }
}
