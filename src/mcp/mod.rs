//! MCP (Model Context Protocol) server and tool types.
//!
//! Exposes the Jira client as two tools, `jira_get_issue` and
//! `jira_add_comment`, for LLM hosts speaking MCP over stdio.
//!
//! # Example
//!
//! ```no_run
//! use jira_mcp::mcp::JiraServer;
//!
//! # fn main() -> jira_mcp::Result<()> {
//! let server = JiraServer::from_env()?;
//! // Server can now be used with rmcp transport
//! # Ok(())
//! # }
//! ```

mod params;
mod server;

pub use params::*;
pub use server::JiraServer;
