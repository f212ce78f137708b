//! Sampling Types
//!
//! Server-initiated LLM sampling requests. The server asks the connected
//! client's host to run a completion and return the result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::content::Content;
use super::{map_omitted, meta_omitted, RequestMeta, Role};

/// A message issued to or received from an LLM API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SamplingMessage {
    pub role: Role,
    pub content: Content,
}

impl SamplingMessage {
    /// A user message with text content.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::text(text),
        }
    }

    /// An assistant message with text content.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::text(text),
        }
    }
}

/// Preferences for model selection. Priorities range from 0.0 to 1.0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelPreferences {
    /// Hints for model selection, evaluated in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<ModelHint>>,

    /// Priority for cost efficiency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_priority: Option<f64>,

    /// Priority for response speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_priority: Option<f64>,

    /// Priority for model intelligence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intelligence_priority: Option<f64>,
}

/// Hint for model selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelHint {
    /// Model name pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ModelHint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// What MCP context to include in the sampling request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum IncludeContext {
    None,
    ThisServer,
    AllServers,
}

/// Server request to create a message via the client's LLM.
///
/// Carries two distinct metadata slots: `llm_metadata` is provider-specific
/// and rides in `params.metadata`; MCP metadata rides in `params._meta`.
/// They round-trip independently and are never merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    pub messages: Vec<SamplingMessage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_preferences: Option<ModelPreferences>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_context: Option<IncludeContext>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Maximum tokens to generate.
    pub max_tokens: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,

    /// Provider-specific metadata, passed through to the LLM API.
    #[serde(
        rename = "metadata",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub llm_metadata: Option<Map<String, Value>>,

    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

impl CreateMessageRequest {
    /// A minimal request with messages and a token budget.
    pub fn new(messages: Vec<SamplingMessage>, max_tokens: i64) -> Self {
        Self {
            messages,
            model_preferences: None,
            system_prompt: None,
            include_context: None,
            temperature: None,
            max_tokens,
            stop_sequences: None,
            llm_metadata: None,
            meta: None,
        }
    }
}

/// The client's response to a sampling request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageResult {
    pub role: Role,
    pub content: Content,

    /// Name of the model that generated the message.
    pub model: String,

    /// Why sampling stopped, if known. Well-known values are "endTurn",
    /// "stopSequence", and "maxTokens"; providers may send others.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

impl CreateMessageResult {
    /// An assistant text response from the given model.
    pub fn assistant_text(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::text(text),
            model: model.into(),
            stop_reason: Some("endTurn".to_string()),
            meta: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sampling_message_constructors() {
        let message = SamplingMessage::user("Hello");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content.as_text(), Some("Hello"));
    }

    #[test]
    fn test_create_message_request_aliases() {
        let request = CreateMessageRequest {
            model_preferences: Some(ModelPreferences {
                hints: Some(vec![ModelHint::new("claude")]),
                cost_priority: Some(0.2),
                speed_priority: Some(0.5),
                intelligence_priority: Some(0.9),
            }),
            system_prompt: Some("be brief".to_string()),
            include_context: Some(IncludeContext::ThisServer),
            stop_sequences: Some(vec!["END".to_string()]),
            ..CreateMessageRequest::new(vec![SamplingMessage::user("hi")], 100)
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["maxTokens"], 100);
        assert_eq!(json["systemPrompt"], "be brief");
        assert_eq!(json["includeContext"], "thisServer");
        assert_eq!(json["stopSequences"][0], "END");
        assert_eq!(json["modelPreferences"]["costPriority"], 0.2);
        assert_eq!(json["modelPreferences"]["speedPriority"], 0.5);
        assert_eq!(json["modelPreferences"]["intelligencePriority"], 0.9);
        assert_eq!(json["modelPreferences"]["hints"][0]["name"], "claude");
    }

    #[test]
    fn test_create_message_request_metadata_slots_are_distinct() {
        let mut llm_metadata = Map::new();
        llm_metadata.insert("top_k".to_string(), json!(40));

        let mut request = CreateMessageRequest::new(vec![SamplingMessage::user("hi")], 50);
        request.llm_metadata = Some(llm_metadata);
        request.meta = Some(RequestMeta::progress("tok-1"));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["metadata"]["top_k"], 40);
        assert_eq!(json["_meta"]["progressToken"], "tok-1");
        assert!(json["metadata"].get("progressToken").is_none());

        let parsed: CreateMessageRequest = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn test_create_message_result_roundtrip() {
        let result = CreateMessageResult::assistant_text("test response", "test-model");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["stopReason"], "endTurn");

        let parsed: CreateMessageResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_create_message_request_requires_max_tokens() {
        let payload = json!({ "messages": [] });
        assert!(serde_json::from_value::<CreateMessageRequest>(payload).is_err());
    }
}
