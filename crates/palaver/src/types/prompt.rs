//! Prompt Types
//!
//! Prompt templates, listing, and retrieval.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::content::Content;
use super::{map_omitted, meta_omitted, Cursor, RequestMeta, Role};

/// Describes an argument that a prompt can accept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptArgument {
    pub name: String,

    /// Human-readable description of the argument.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the argument must be provided.
    #[serde(default)]
    pub required: bool,
}

impl PromptArgument {
    /// Create an optional argument.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            required: false,
        }
    }

    /// Mark the argument as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A prompt or prompt template the server offers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prompt {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Arguments used for templating the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<PromptArgument>>,
}

/// A message that is part of a prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PromptMessage {
    pub role: Role,
    pub content: Content,
}

/// Request to list available prompts and prompt templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListPromptsRequest {
    /// Return results starting after this cursor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,

    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

/// Response containing available prompts and pagination info.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListPromptsResult {
    pub prompts: Vec<Prompt>,

    /// Token for retrieving the next page, if more results exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

/// Request a specific prompt, with template arguments filled in by the
/// server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetPromptRequest {
    /// Name of the prompt or prompt template.
    pub name: String,

    /// Arguments to use for templating the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<HashMap<String, String>>,

    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

impl GetPromptRequest {
    /// Get the named prompt.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
            meta: None,
        }
    }
}

/// Response containing the prompt messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetPromptResult {
    /// Human-readable description of the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub messages: Vec<PromptMessage>,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

/// Notification that the prompt list has changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PromptListChangedNotification {
    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}
