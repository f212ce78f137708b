//! Completion Types
//!
//! Argument completion for prompts and resource templates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{map_omitted, meta_omitted, RequestMeta};

/// What a completion request is completing against: a prompt argument or a
/// resource template variable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CompletionReference {
    /// Reference to a prompt by name.
    #[serde(rename = "ref/prompt")]
    Prompt { name: String },

    /// Reference to a resource by URI or URI template.
    #[serde(rename = "ref/resource")]
    Resource { uri: String },
}

/// The argument being completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionArgument {
    pub name: String,
    pub value: String,
}

/// Request for completion options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompleteRequest {
    #[serde(rename = "ref")]
    pub reference: CompletionReference,

    pub argument: CompletionArgument,

    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

/// Completion options returned by the server. At most 100 values per
/// response; `has_more` signals truncation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub values: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
}

/// Response to a completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompleteResult {
    pub completion: Completion,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_reference_tag() {
        let reference = CompletionReference::Prompt {
            name: "summarize".to_string(),
        };

        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(json["type"], "ref/prompt");
        assert_eq!(json["name"], "summarize");
    }

    #[test]
    fn test_complete_request_ref_key() {
        let request = CompleteRequest {
            reference: CompletionReference::Resource {
                uri: "file:///logs/{date}.log".to_string(),
            },
            argument: CompletionArgument {
                name: "date".to_string(),
                value: "2025".to_string(),
            },
            meta: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["ref"]["type"], "ref/resource");
        assert_eq!(json["argument"]["name"], "date");

        let parsed: CompleteRequest = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_complete_result_has_more_alias() {
        let payload = json!({
            "completion": { "values": ["2025-01-01"], "hasMore": true, "total": 31 }
        });

        let result: CompleteResult = serde_json::from_value(payload).unwrap();
        assert_eq!(result.completion.values.len(), 1);
        assert_eq!(result.completion.has_more, Some(true));
        assert_eq!(result.completion.total, Some(31));
    }
}
