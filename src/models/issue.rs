//! Issue payloads and the merged issue summary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{text_or_empty, Comment, CommentPage};

/// Response of `GET /issue/{key}?fields=summary,description,parent`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueResponse {
    /// Issue key as reported by the server.
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default)]
    pub fields: IssueFields,
}

/// The subset of issue fields requested from the server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: Option<String>,

    /// Plain text on Jira Server; may be a rich-text document elsewhere.
    #[serde(default)]
    pub description: Option<Value>,

    #[serde(default)]
    pub parent: Option<ParentRef>,
}

/// Reference to a parent issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    /// Empty when the server omits it.
    #[serde(default)]
    pub key: String,
}

/// An issue with one page of its comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    pub title: String,
    pub description: String,
    pub parent: Option<ParentRef>,
    pub comments: Vec<Comment>,
    /// Total comments on the issue across all pages.
    pub total_comments: u64,
}

impl IssueSummary {
    /// Merge the issue fields with a page of comments.
    ///
    /// At most `max_comments` comments are kept.
    pub fn merge(issue: IssueResponse, page: CommentPage, max_comments: usize) -> Self {
        let fields = issue.fields;
        let returned = page.comments.len() as u64;
        let total_comments = page.total.unwrap_or(returned);

        let comments = page
            .comments
            .into_iter()
            .take(max_comments)
            .map(Comment::from)
            .collect();

        Self {
            title: fields.summary.unwrap_or_default(),
            description: text_or_empty(fields.description.as_ref()),
            parent: fields.parent,
            comments,
            total_comments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(json: Value) -> CommentPage {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn issue_response_deserializes_server_payload() {
        let json = r#"{
            "id": "10001",
            "key": "PROJ-1",
            "fields": {
                "summary": "Login fails",
                "description": "Steps to reproduce...",
                "parent": {"id": "10000", "key": "PROJ-0", "fields": {}}
            }
        }"#;

        let issue: IssueResponse = serde_json::from_str(json).unwrap();
        assert_eq!(issue.key.as_deref(), Some("PROJ-1"));
        assert_eq!(issue.fields.summary.as_deref(), Some("Login fails"));
        assert_eq!(issue.fields.parent.unwrap().key, "PROJ-0");
    }

    #[test]
    fn parent_without_key_still_deserializes() {
        let issue: IssueResponse = serde_json::from_value(json!({
            "key": "PROJ-3",
            "fields": {"summary": "Child", "parent": {"id": "10000"}}
        }))
        .unwrap();

        let summary = IssueSummary::merge(issue, page(json!({"comments": []})), 30);
        assert_eq!(summary.title, "Child");
        assert_eq!(summary.parent, Some(ParentRef { key: String::new() }));
    }

    #[test]
    fn merge_defaults_missing_fields() {
        let issue: IssueResponse = serde_json::from_value(json!({"key": "PROJ-2"})).unwrap();
        let summary = IssueSummary::merge(issue, page(json!({"comments": []})), 30);

        assert_eq!(summary.title, "");
        assert_eq!(summary.description, "");
        assert!(summary.parent.is_none());
        assert!(summary.comments.is_empty());
        assert_eq!(summary.total_comments, 0);
    }

    #[test]
    fn merge_falls_back_to_page_length_without_total() {
        let issue = IssueResponse::default();
        let comments = page(json!({
            "comments": [{"body": "a"}, {"body": "b"}]
        }));

        let summary = IssueSummary::merge(issue, comments, 30);
        assert_eq!(summary.total_comments, 2);
    }

    #[test]
    fn merge_caps_comments_at_requested_size() {
        let issue = IssueResponse::default();
        let comments = page(json!({
            "total": 3,
            "comments": [{"body": "a"}, {"body": "b"}, {"body": "c"}]
        }));

        let summary = IssueSummary::merge(issue, comments, 2);
        assert_eq!(summary.comments.len(), 2);
        assert_eq!(summary.total_comments, 3);
    }

    #[test]
    fn summary_serializes_camel_case_with_null_parent() {
        let summary = IssueSummary {
            title: "t".to_string(),
            description: String::new(),
            parent: None,
            comments: Vec::new(),
            total_comments: 0,
        };

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["totalComments"], 0);
        assert!(value["parent"].is_null());
        assert!(value.get("total_comments").is_none());
    }
}
