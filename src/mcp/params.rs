//! MCP tool parameter types with JSON Schema support.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::client::DEFAULT_MAX_COMMENTS;

fn default_max_comments() -> u32 {
    DEFAULT_MAX_COMMENTS
}

/// Parameters for the `jira_get_issue` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetIssueParams {
    /// Jira issue key (e.g., "PROJ-123").
    pub issue_key: String,
    /// Maximum number of comments to return (default: 30).
    #[serde(default = "default_max_comments")]
    pub max_comments: u32,
    /// Offset for comments pagination (default: 0).
    #[serde(default)]
    pub offset: u32,
}

/// Parameters for the `jira_add_comment` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentParams {
    /// Jira issue key (e.g., "PROJ-123").
    pub issue_key: String,
    /// Comment text to add.
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_issue_params_schema_generates() {
        let schema = schemars::schema_for!(GetIssueParams);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("issueKey"));
        assert!(json.contains("maxComments"));
        assert!(json.contains("offset"));
    }

    #[test]
    fn add_comment_params_schema_generates() {
        let schema = schemars::schema_for!(AddCommentParams);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("issueKey"));
        assert!(json.contains("comment"));
    }

    #[test]
    fn get_issue_params_deserializes_with_defaults() {
        let json = r#"{"issueKey": "PROJ-123"}"#;
        let params: GetIssueParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.issue_key, "PROJ-123");
        assert_eq!(params.max_comments, 30);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn get_issue_params_deserializes_with_all_fields() {
        let json = r#"{"issueKey": "PROJ-123", "maxComments": 5, "offset": 10}"#;
        let params: GetIssueParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.max_comments, 5);
        assert_eq!(params.offset, 10);
    }

    #[test]
    fn add_comment_params_requires_comment() {
        let json = r#"{"issueKey": "PROJ-123"}"#;
        assert!(serde_json::from_str::<AddCommentParams>(json).is_err());
    }
}
