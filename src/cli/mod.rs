//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! jira-mcp binary. Connection values fall back to environment variables.

use clap::{Parser, Subcommand};

use crate::client::DEFAULT_MAX_COMMENTS;
use crate::config::{Settings, TOKEN_VAR, URL_VAR, USERNAME_VAR};

/// Jira MCP server and command-line client.
#[derive(Parser, Debug)]
#[command(name = "jira-mcp", about = "Jira MCP server", version)]
pub struct Cli {
    /// Jira REST API base URL (e.g. https://jira.example.com/rest/api/2).
    #[arg(long, env = URL_VAR, global = true)]
    pub url: Option<String>,

    /// Username; switches authentication from Bearer to Basic.
    #[arg(long, env = USERNAME_VAR, global = true)]
    pub username: Option<String>,

    /// API token or personal access token.
    #[arg(long, env = TOKEN_VAR, global = true, hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the MCP tools over stdio (default).
    Serve,

    /// Fetch an issue with a page of its comments.
    Get {
        /// Issue key (e.g. PROJ-123).
        issue_key: String,

        /// Maximum number of comments to return.
        #[arg(long, default_value_t = DEFAULT_MAX_COMMENTS)]
        max_comments: u32,

        /// Offset of the first comment.
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Add a comment to an issue.
    Comment {
        /// Issue key (e.g. PROJ-123).
        issue_key: String,

        /// Comment text.
        body: String,
    },
}

impl Cli {
    /// Settings built from the parsed arguments.
    pub fn settings(&self) -> Settings {
        Settings::new(self.url.clone(), self.username.clone(), self.token.clone())
    }

    /// The command to run, `serve` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
