//! MCP Protocol Types
//!
//! Type definitions for the MCP 2025-03-26 specification, organized by their
//! role in the protocol:
//!
//! - `jsonrpc` - JSON-RPC 2.0 envelopes and message classification
//! - `error` - protocol error payloads and standard error codes
//! - `initialize` - handshake and capability negotiation
//! - `common` - ping, cancellation, progress, empty results
//! - `content` - content blocks (text, image, audio, embedded resource)
//! - `tool` / `resource` / `prompt` / `completion` / `logging` / `roots` /
//!   `sampling` - the per-area request, result, and notification types
//! - `unions` - the closed method-discriminated sums used by the session

pub mod common;
pub mod completion;
pub mod content;
pub mod error;
pub mod initialize;
pub mod jsonrpc;
pub mod logging;
pub mod prompt;
pub mod resource;
pub mod roots;
pub mod sampling;
pub mod tool;
pub mod unions;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role in a conversation - user or assistant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Opaque pagination position used by list operations.
pub type Cursor = String;

/// Token used to tie progress notifications back to a long-running request.
/// Can be a string or integer, preserved verbatim on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum ProgressToken {
    Number(i64),
    String(String),
}

impl std::fmt::Display for ProgressToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressToken::Number(n) => write!(f, "{}", n),
            ProgressToken::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ProgressToken {
    fn from(n: i64) -> Self {
        ProgressToken::Number(n)
    }
}

impl From<&str> for ProgressToken {
    fn from(s: &str) -> Self {
        ProgressToken::String(s.to_string())
    }
}

impl From<String> for ProgressToken {
    fn from(s: String) -> Self {
        ProgressToken::String(s)
    }
}

/// Request metadata carried in `params._meta`.
///
/// The progress token gets its own slot (`_meta.progressToken`); any other
/// metadata keys ride alongside it. An empty `_meta` is omitted from the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequestMeta {
    /// Token identifying this request for progress updates.
    #[serde(
        rename = "progressToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub progress_token: Option<ProgressToken>,

    /// Additional metadata keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RequestMeta {
    /// Metadata carrying only a progress token.
    pub fn progress(token: impl Into<ProgressToken>) -> Self {
        Self {
            progress_token: Some(token.into()),
            extra: Map::new(),
        }
    }

    /// True when there is nothing to serialize.
    pub fn is_empty(&self) -> bool {
        self.progress_token.is_none() && self.extra.is_empty()
    }
}

/// Skip helper: treat a missing or empty `_meta` as absent.
pub(crate) fn meta_omitted(meta: &Option<RequestMeta>) -> bool {
    meta.as_ref().is_none_or(RequestMeta::is_empty)
}

/// Skip helper for plain `_meta` maps on notifications and results.
pub(crate) fn map_omitted(meta: &Option<Map<String, Value>>) -> bool {
    meta.as_ref().is_none_or(Map::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_value(Role::User).unwrap(), json!("user"));
        assert_eq!(
            serde_json::to_value(Role::Assistant).unwrap(),
            json!("assistant")
        );
    }

    #[test]
    fn test_progress_token_roundtrip() {
        let token = ProgressToken::from(7);
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json, json!(7));
        assert_eq!(serde_json::from_value::<ProgressToken>(json).unwrap(), token);

        let token = ProgressToken::from("op-1");
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json, json!("op-1"));
        assert_eq!(serde_json::from_value::<ProgressToken>(json).unwrap(), token);
    }

    #[test]
    fn test_request_meta_progress_token_key() {
        let meta = RequestMeta::progress(42);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json, json!({ "progressToken": 42 }));
    }

    #[test]
    fn test_request_meta_extra_keys_flattened() {
        let mut meta = RequestMeta::progress("tok");
        meta.extra.insert("trace".to_string(), json!("abc"));

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["progressToken"], "tok");
        assert_eq!(json["trace"], "abc");

        let parsed: RequestMeta = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, meta);
    }

    #[test]
    fn test_empty_meta_is_omitted() {
        assert!(meta_omitted(&None));
        assert!(meta_omitted(&Some(RequestMeta::default())));
        assert!(!meta_omitted(&Some(RequestMeta::progress(1))));
    }
}
