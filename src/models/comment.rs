//! Comment payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::text_or_empty;

const UNKNOWN_AUTHOR: &str = "Unknown";

/// Response of `GET /issue/{key}/comment?startAt=&maxResults=`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    #[serde(default)]
    pub start_at: Option<u64>,

    #[serde(default)]
    pub max_results: Option<u64>,

    /// Total comments on the issue, across all pages.
    #[serde(default)]
    pub total: Option<u64>,

    #[serde(default)]
    pub comments: Vec<RawComment>,
}

/// A comment as the server returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComment {
    #[serde(default)]
    pub author: Option<CommentAuthor>,

    #[serde(default)]
    pub body: Option<Value>,

    #[serde(default)]
    pub created: Option<String>,
}

/// Comment author.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    #[serde(default)]
    pub display_name: Option<String>,

    /// Account name (Jira Server username).
    #[serde(default)]
    pub name: Option<String>,
}

impl CommentAuthor {
    /// Display name, else account name, else `"Unknown"`.
    fn label(author: Option<Self>) -> String {
        author
            .and_then(|a| {
                a.display_name
                    .filter(|n| !n.is_empty())
                    .or(a.name.filter(|n| !n.is_empty()))
            })
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }
}

/// A normalized comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub author: String,
    pub body: String,
    pub created: String,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Self {
            author: CommentAuthor::label(raw.author),
            body: text_or_empty(raw.body.as_ref()),
            created: raw.created.unwrap_or_default(),
        }
    }
}

/// Response of `POST /issue/{key}/comment`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedComment {
    /// Usually a string; some servers send a number.
    #[serde(default)]
    pub id: Option<Value>,
}

impl CreatedComment {
    pub fn id(&self) -> String {
        text_or_empty(self.id.as_ref())
    }
}

/// Outcome of a confirmed comment creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPostResult {
    /// Always `true`; failures are reported as errors instead.
    pub success: bool,
    pub comment_id: String,
}

impl CommentPostResult {
    pub fn created(comment_id: impl Into<String>) -> Self {
        Self {
            success: true,
            comment_id: comment_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn comment(json: Value) -> Comment {
        serde_json::from_value::<RawComment>(json).unwrap().into()
    }

    #[test]
    fn comment_page_deserializes_server_payload() {
        let json = r#"{
            "startAt": 0,
            "maxResults": 2,
            "total": 5,
            "comments": [
                {
                    "id": "100",
                    "author": {"name": "alice", "displayName": "Alice Smith"},
                    "body": "First!",
                    "created": "2024-01-01T10:00:00.000+0000",
                    "updated": "2024-01-01T10:00:00.000+0000"
                },
                {
                    "id": "101",
                    "author": {"name": "bob"},
                    "body": "Second",
                    "created": "2024-01-02T10:00:00.000+0000"
                }
            ]
        }"#;

        let page: CommentPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.start_at, Some(0));
        assert_eq!(page.max_results, Some(2));
        assert_eq!(page.total, Some(5));
        assert_eq!(page.comments.len(), 2);
        assert_eq!(page.comments[1].created.as_deref(), Some("2024-01-02T10:00:00.000+0000"));
    }

    #[test]
    fn author_prefers_display_name() {
        let c = comment(json!({"author": {"name": "alice", "displayName": "Alice Smith"}}));
        assert_eq!(c.author, "Alice Smith");
    }

    #[test]
    fn author_falls_back_to_account_name() {
        let c = comment(json!({"author": {"name": "bob", "displayName": ""}}));
        assert_eq!(c.author, "bob");
    }

    #[test]
    fn missing_author_is_unknown() {
        let c = comment(json!({"body": "anonymous", "created": "2024-01-01"}));
        assert_eq!(c.author, "Unknown");
        assert_eq!(c.body, "anonymous");

        let c = comment(json!({"author": {}}));
        assert_eq!(c.author, "Unknown");
    }

    #[test]
    fn missing_body_and_created_are_empty() {
        let c = comment(json!({"author": {"name": "carol"}}));
        assert_eq!(c.body, "");
        assert_eq!(c.created, "");
    }

    #[test]
    fn created_comment_id_accepts_string_or_number() {
        let created: CreatedComment = serde_json::from_value(json!({"id": "123"})).unwrap();
        assert_eq!(created.id(), "123");

        let created: CreatedComment = serde_json::from_value(json!({"id": 456})).unwrap();
        assert_eq!(created.id(), "456");

        let created: CreatedComment = serde_json::from_value(json!({})).unwrap();
        assert_eq!(created.id(), "");
    }

    #[test]
    fn post_result_serializes_camel_case() {
        let value = serde_json::to_value(CommentPostResult::created("123")).unwrap();
        assert_eq!(value, json!({"success": true, "commentId": "123"}));
    }
}
