//! Jira issue client.
//!
//! Each operation resolves the configuration, sends its requests through
//! the retrying executor and normalizes the JSON it gets back.

use std::sync::Arc;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use crate::config::{Configuration, Settings};
use crate::error::{JiraError, Result};
use crate::models::{CommentPage, CommentPostResult, CreatedComment, IssueResponse, IssueSummary};
use crate::retry::{self, RetryPolicy, RetryableRequest};
use crate::transport::{ApiResponse, HttpTransport, Transport};

/// Default number of comments returned by [`JiraClient::get_issue`].
pub const DEFAULT_MAX_COMMENTS: u32 = 30;

const ISSUE_FIELDS: &str = "summary,description,parent";

/// Client for the Jira Server REST API.
///
/// Cheaply cloneable; clones share the transport and settings.
///
/// # Example
///
/// ```no_run
/// use jira_mcp::{JiraClient, Settings};
///
/// # async fn example() -> jira_mcp::Result<()> {
/// let client = JiraClient::new(Settings::from_env())?;
/// let issue = client.get_issue("PROJ-123", 10, 0).await?;
/// println!("{} ({} comments)", issue.title, issue.total_comments);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct JiraClient {
    transport: Arc<dyn Transport>,
    settings: Arc<Settings>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("settings", &self.settings)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    /// Create a client from `JIRA_URL`, `JIRA_USERNAME` and `JIRA_API_TOKEN`.
    ///
    /// Missing values are only reported when an operation runs.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self> {
        Self::new(Settings::from_env())
    }

    /// Create a client over HTTP with the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Self::with_transport(settings, Arc::new(HttpTransport::new()?)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(settings: Settings, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            settings: Arc::new(settings),
            policy: RetryPolicy::DEFAULT,
        }
    }

    /// Override the retry budget applied to every request.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch an issue with one page of its comments.
    ///
    /// The issue fields and the comment page are requested concurrently;
    /// both must succeed.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Configuration`] for missing settings,
    /// [`JiraError::Upstream`] if either request ends with a non-success
    /// status, and [`JiraError::Transport`] if the server is unreachable.
    #[tracing::instrument(skip(self))]
    pub async fn get_issue(
        &self,
        issue_key: &str,
        max_comments: u32,
        offset: u32,
    ) -> Result<IssueSummary> {
        let config = self.settings.resolve()?;
        let issue_path = issue_url(&config, issue_key);
        let headers = request_headers(&config, false)?;

        let issue_request = RetryableRequest::new(
            Method::GET,
            format!("{issue_path}?fields={ISSUE_FIELDS}"),
            headers.clone(),
        )
        .policy(self.policy);

        let comments_request = RetryableRequest::new(
            Method::GET,
            format!("{issue_path}/comment?startAt={offset}&maxResults={max_comments}"),
            headers,
        )
        .policy(self.policy);

        let (issue, comments) = tokio::try_join!(
            self.send(&issue_request, format!("Failed to fetch issue {issue_key}")),
            self.send(
                &comments_request,
                format!("Failed to fetch comments for {issue_key}")
            )
        )?;

        let issue: IssueResponse = issue.json()?;
        let page: CommentPage = comments.json()?;
        debug!(
            "fetched issue with {} comments (total: {:?})",
            page.comments.len(),
            page.total
        );

        Ok(IssueSummary::merge(issue, page, max_comments as usize))
    }

    /// Append a comment to an issue.
    ///
    /// The POST is only replayed on transport failures, 5xx and 406, never
    /// after the server has confirmed the comment.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError::Configuration`] for missing settings,
    /// [`JiraError::Upstream`] on a non-success status,
    /// [`JiraError::Transport`] if the server is unreachable, and
    /// [`JiraError::Body`] if the confirmation could not be read.
    #[tracing::instrument(skip(self, body), fields(body_len = body.len()))]
    pub async fn add_comment(&self, issue_key: &str, body: &str) -> Result<CommentPostResult> {
        let config = self.settings.resolve()?;

        let request = RetryableRequest::new(
            Method::POST,
            format!("{}/comment", issue_url(&config, issue_key)),
            request_headers(&config, true)?,
        )
        .json_body(json!({ "body": body }))
        .policy(self.policy);

        let created: CreatedComment = self
            .send(&request, format!("Failed to add comment to {issue_key}"))
            .await?
            .json()?;
        let comment_id = created.id();
        info!(comment_id = %comment_id, "comment created");

        Ok(CommentPostResult::created(comment_id))
    }

    /// Execute a request and reject non-success responses.
    async fn send(&self, request: &RetryableRequest, context: String) -> Result<ApiResponse> {
        retry::execute(self.transport.as_ref(), request)
            .await?
            .error_for_status(context)
    }
}

fn issue_url(config: &Configuration, issue_key: &str) -> String {
    format!("{}/issue/{}", config.base_url, urlencoding::encode(issue_key))
}

fn request_headers(config: &Configuration, json_body: bool) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&config.auth_header).map_err(|_| {
        JiraError::Configuration("credentials contain characters not allowed in a header".to_string())
    })?;
    auth.set_sensitive(true);

    headers.insert(header::AUTHORIZATION, auth);
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    if json_body {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }

    Ok(headers)
}
