//! Jira MCP server and REST client.
//!
//! A small client for on-premises Jira (Server / Data Center) that reads an
//! issue together with a page of its comments and appends comments, exposed
//! to LLM hosts as MCP tools.
//!
//! # Quick Start
//!
//! ```no_run
//! use jira_mcp::{JiraClient, Settings};
//!
//! #[tokio::main]
//! async fn main() -> jira_mcp::Result<()> {
//!     let client = JiraClient::new(Settings::from_env())?;
//!
//!     let issue = client.get_issue("PROJ-123", 30, 0).await?;
//!     println!("{}: {} comments", issue.title, issue.total_comments);
//!
//!     let posted = client.add_comment("PROJ-123", "Looking into it").await?;
//!     println!("Created comment {}", posted.comment_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Settings`] resolves into a [`Configuration`] on every call.
//! - [`retry::execute`] is the single path for outbound requests and
//!   replays 5xx, 406 and network failures with a fixed delay.
//! - [`JiraClient`] composes requests and normalizes the responses.
//!
//! # Configuration
//!
//! - `JIRA_URL` (required) - REST API base URL, e.g. `https://jira.example.com/rest/api/2`
//! - `JIRA_API_TOKEN` (required) - API or personal access token
//! - `JIRA_USERNAME` (optional) - switches from Bearer to Basic authentication

pub mod cli;
mod client;
mod config;
mod error;
pub mod mcp;
mod models;
pub mod retry;
pub mod transport;

pub use client::{JiraClient, DEFAULT_MAX_COMMENTS};
pub use config::{Configuration, Settings};
pub use error::{JiraError, Result};
pub use models::{
    Comment, CommentAuthor, CommentPage, CommentPostResult, CreatedComment, IssueFields,
    IssueResponse, IssueSummary, ParentRef, RawComment,
};
pub use retry::{RetryPolicy, RetryableRequest};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
