//! Bounded retry of transient HTTP failures.
//!
//! Every outbound call goes through [`execute`]. A completed response is
//! classified as success, terminal failure or retryable failure:
//!
//! - 2xx: returned.
//! - 4xx except 406: returned at once, replaying would not help.
//! - 5xx and 406: retried after a fixed delay while attempts remain; the
//!   last such response is returned as-is for the caller to classify.
//!
//! Transport failures are retried the same way; if the final attempt also
//! fails at transport level the error is propagated.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};

use crate::error::Result;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Retry budget for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed wait between attempts.
    pub retry_delay: Duration,
}

impl RetryPolicy {
    /// Three attempts, one second apart.
    pub const DEFAULT: Self = Self {
        max_attempts: 3,
        retry_delay: Duration::from_millis(1000),
    };

    pub fn new(max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One request plus the budget it may spend.
#[derive(Debug, Clone)]
pub struct RetryableRequest {
    pub request: ApiRequest,
    pub policy: RetryPolicy,
}

impl RetryableRequest {
    pub fn new(method: Method, url: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            request: ApiRequest {
                method,
                url: url.into(),
                headers,
                body: None,
            },
            policy: RetryPolicy::DEFAULT,
        }
    }

    #[must_use]
    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.request.body = Some(body);
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// How a completed response should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Success,
    Retryable,
    Terminal,
}

impl Classification {
    pub fn of(status: StatusCode) -> Self {
        if status.is_success() {
            Classification::Success
        } else if status.is_server_error() || status == StatusCode::NOT_ACCEPTABLE {
            Classification::Retryable
        } else {
            Classification::Terminal
        }
    }
}

/// Executor state.
#[derive(Debug)]
enum State {
    /// About to make attempt `n` (1-based).
    Attempting(u32),
    Succeeded(ApiResponse),
    FailedTerminal(ApiResponse),
    FailedExhausted(ApiResponse),
}

/// Run `request` through `transport`, retrying transient failures.
///
/// # Errors
///
/// Returns the transport error of the final attempt when no attempt
/// produced an HTTP response. Non-success responses are returned as `Ok`.
#[tracing::instrument(
    skip(transport, request),
    fields(method = %request.request.method, url = %request.request.url)
)]
pub async fn execute(transport: &dyn Transport, request: &RetryableRequest) -> Result<ApiResponse> {
    let RetryPolicy {
        max_attempts,
        retry_delay,
    } = request.policy;
    let max_attempts = max_attempts.max(1);

    let mut state = State::Attempting(1);
    loop {
        state = match state {
            State::Attempting(attempt) => {
                debug!("request attempt {attempt}/{max_attempts}");
                let has_more = attempt < max_attempts;

                match transport.send(&request.request).await {
                    Ok(response) => match Classification::of(response.status()) {
                        Classification::Success => State::Succeeded(response),
                        Classification::Terminal => State::FailedTerminal(response),
                        Classification::Retryable if has_more => {
                            warn!(
                                "attempt {attempt}/{max_attempts} failed: {} - {}. Retrying in {}ms",
                                response.status(),
                                response.text(),
                                retry_delay.as_millis()
                            );
                            tokio::time::sleep(retry_delay).await;
                            State::Attempting(attempt + 1)
                        }
                        Classification::Retryable => State::FailedExhausted(response),
                    },
                    Err(e) if e.is_transient() && has_more => {
                        warn!(
                            "attempt {attempt}/{max_attempts} failed with error: {e}. Retrying in {}ms",
                            retry_delay.as_millis()
                        );
                        tokio::time::sleep(retry_delay).await;
                        State::Attempting(attempt + 1)
                    }
                    Err(e) => return Err(e),
                }
            }
            State::Succeeded(response) | State::FailedTerminal(response) => return Ok(response),
            State::FailedExhausted(response) => {
                warn!(
                    "giving up after {max_attempts} attempts: {}",
                    response.status()
                );
                return Ok(response);
            }
        };
    }
}
