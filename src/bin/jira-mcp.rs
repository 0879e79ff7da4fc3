//! Jira MCP server binary.
//!
//! Serves the MCP tools over stdio by default; `get` and `comment` run a
//! single operation and print the JSON result.

use clap::Parser;
use jira_mcp::cli::{Cli, Command};
use jira_mcp::mcp::JiraServer;
use jira_mcp::JiraClient;
use rmcp::{transport::stdio, ServiceExt};
use serde::Serialize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the MCP protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings();
    if !settings.is_complete() {
        tracing::warn!("JIRA_URL or JIRA_API_TOKEN is not set; tool calls will fail");
    }

    let client = match JiraClient::new(settings) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(client, cli.command()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: JiraClient, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Serve => {
            let service = JiraServer::new(client).serve(stdio()).await?;
            tracing::info!("Jira MCP server running on stdio");
            service.waiting().await?;
        }
        Command::Get {
            issue_key,
            max_comments,
            offset,
        } => {
            let issue = client.get_issue(&issue_key, max_comments, offset).await?;
            output(&issue)?;
        }
        Command::Comment { issue_key, body } => {
            let posted = client.add_comment(&issue_key, &body).await?;
            output(&posted)?;
        }
    }
    Ok(())
}

fn output<T: Serialize>(item: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(item)?);
    Ok(())
}
