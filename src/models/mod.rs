//! Jira REST payloads and the normalized shapes returned to callers.

mod comment;
mod issue;

pub use comment::*;
pub use issue::*;

use serde_json::Value;

/// Render an optional JSON value as text.
///
/// Strings pass through, null or missing become empty, anything else
/// (rich-text documents, numbers) is rendered as compact JSON.
pub(crate) fn text_or_empty(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_or_empty_handles_each_shape() {
        assert_eq!(text_or_empty(None), "");
        assert_eq!(text_or_empty(Some(&Value::Null)), "");
        assert_eq!(text_or_empty(Some(&json!("plain"))), "plain");
        assert_eq!(text_or_empty(Some(&json!(42))), "42");
        assert_eq!(
            text_or_empty(Some(&json!({"type": "doc"}))),
            r#"{"type":"doc"}"#
        );
    }
}
