//! MCP Server handler for Jira.

use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData as McpError, Implementation,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
        ToolsCapability,
    },
    service::RequestContext,
    RoleServer,
};
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::{
    mcp::{AddCommentParams, GetIssueParams},
    JiraClient, JiraError,
};

/// Tool name for fetching an issue.
pub const GET_ISSUE_TOOL: &str = "jira_get_issue";
/// Tool name for adding a comment.
pub const ADD_COMMENT_TOOL: &str = "jira_add_comment";

/// Jira MCP Server.
///
/// Implements the MCP ServerHandler trait. Arguments are validated here;
/// everything else is delegated to [`JiraClient`].
///
/// # Tools
///
/// - `jira_get_issue` - Fetch an issue with a page of comments
/// - `jira_add_comment` - Append a comment to an issue
#[derive(Clone)]
pub struct JiraServer {
    client: Arc<JiraClient>,
}

impl JiraServer {
    /// Create a new JiraServer from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_env() -> crate::Result<Self> {
        let client = JiraClient::from_env()?;
        Ok(Self::new(client))
    }

    /// Create a new JiraServer with an existing client.
    pub fn new(client: JiraClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Generate JSON Schema for a type.
    fn schema<T: JsonSchema>() -> Arc<serde_json::Map<String, serde_json::Value>> {
        let schema = schemars::schema_for!(T);
        let value = serde_json::to_value(&schema).unwrap_or(serde_json::json!({}));
        match value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        }
    }

    /// Render an operation outcome as a tool result.
    ///
    /// Jira failures become an error result the host can show to the model,
    /// not a protocol error.
    fn to_tool_result<T: Serialize>(
        outcome: Result<T, JiraError>,
    ) -> Result<CallToolResult, McpError> {
        match outcome {
            Ok(value) => {
                let text = serde_json::to_string_pretty(&value)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(err) => {
                error!("tool call failed: {err}");
                Ok(CallToolResult::error(vec![Content::text(err.to_string())]))
            }
        }
    }

    /// Handle the `jira_get_issue` tool.
    ///
    /// Returns the issue summary as pretty-printed JSON.
    pub async fn handle_get_issue(
        &self,
        params: GetIssueParams,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .client
            .get_issue(&params.issue_key, params.max_comments, params.offset)
            .await;
        Self::to_tool_result(outcome)
    }

    /// Handle the `jira_add_comment` tool.
    pub async fn handle_add_comment(
        &self,
        params: AddCommentParams,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .client
            .add_comment(&params.issue_key, &params.comment)
            .await;
        Self::to_tool_result(outcome)
    }
}

impl ServerHandler for JiraServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "jira-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "Jira MCP Server - Read issues with their comments and add comments.".to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = vec![
            Tool::new(
                GET_ISSUE_TOOL,
                "Get Jira issue details by key, including title, description, \
                 parent reference, and paginated comments with total count",
                Self::schema::<GetIssueParams>(),
            ),
            Tool::new(
                ADD_COMMENT_TOOL,
                "Add a comment to a Jira issue",
                Self::schema::<AddCommentParams>(),
            ),
        ];

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::json!({}));

        match request.name.as_ref() {
            GET_ISSUE_TOOL => {
                let params: GetIssueParams = serde_json::from_value(args)
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                self.handle_get_issue(params).await
            }
            ADD_COMMENT_TOOL => {
                let params: AddCommentParams = serde_json::from_value(args)
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                self.handle_add_comment(params).await
            }
            other => Err(McpError::invalid_params(
                format!("Unknown tool: {other}"),
                None,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;

    fn extract_text(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            rmcp::model::RawContent::Text(t) => &t.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn schema_generates_for_get_issue_params() {
        let schema = JiraServer::schema::<GetIssueParams>();
        assert!(!schema.is_empty());
    }

    #[test]
    fn schema_generates_for_add_comment_params() {
        let schema = JiraServer::schema::<AddCommentParams>();
        assert!(!schema.is_empty());
    }

    #[test]
    fn server_info_names_the_server() {
        let client = JiraClient::new(Settings::default()).unwrap();
        let info = JiraServer::new(client).get_info();
        assert_eq!(info.server_info.name, "jira-mcp-server");
        assert!(info.capabilities.tools.is_some());
    }

    #[tokio::test]
    async fn missing_configuration_is_an_error_result() {
        let client = JiraClient::new(Settings::default()).unwrap();
        let server = JiraServer::new(client);

        let result = server
            .handle_get_issue(GetIssueParams {
                issue_key: "PROJ-1".to_string(),
                max_comments: 30,
                offset: 0,
            })
            .await
            .unwrap();

        assert!(result.is_error.unwrap_or(false));
        assert!(extract_text(&result).contains("JIRA_URL"));
    }

    #[test]
    fn success_renders_pretty_json() {
        let result = JiraServer::to_tool_result(Ok(crate::CommentPostResult::created("7")))
            .unwrap();
        assert!(!result.is_error.unwrap_or(false));
        let value: serde_json::Value = serde_json::from_str(extract_text(&result)).unwrap();
        assert_eq!(value["commentId"], "7");
        assert_eq!(value["success"], true);
    }
}
