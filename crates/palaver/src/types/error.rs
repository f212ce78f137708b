//! MCP Error Types
//!
//! The error payload exchanged in JSON-RPC error responses, the standard
//! error codes, and the decode errors produced while mapping wire payloads
//! to typed values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// JSON-RPC 2.0 standard error codes
// https://www.jsonrpc.org/specification#error_object

/// Invalid JSON was received.
pub const PARSE_ERROR: i32 = -32700;

/// The payload is not a valid request object.
pub const INVALID_REQUEST: i32 = -32600;

/// The method does not exist or is not available.
pub const METHOD_NOT_FOUND: i32 = -32601;

/// Invalid method parameters.
pub const INVALID_PARAMS: i32 = -32602;

/// Internal protocol error.
pub const INTERNAL_ERROR: i32 = -32603;

/// Error payload carried by a JSON-RPC error response.
///
/// `data` is free-form detail: a string, an object, or a rendered error
/// chain (see [`ErrorData::with_source`]). It is omitted from the wire when
/// absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorData {
    /// Error type code.
    pub code: i32,

    /// Human readable error message.
    pub message: String,

    /// Additional error details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorData {
    /// An error with no additional detail.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Attach detail data.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// An error whose detail captures a source error and its cause chain as
    /// a multi-line human-readable string.
    pub fn with_source(
        code: i32,
        message: impl Into<String>,
        source: &(dyn std::error::Error + 'static),
    ) -> Self {
        Self::new(code, message).with_data(Value::String(format_error_chain(source)))
    }

    /// Wire form of the error payload. Infallible by construction.
    pub fn to_protocol(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("code".to_string(), Value::from(self.code));
        obj.insert("message".to_string(), Value::String(self.message.clone()));
        if let Some(data) = &self.data {
            obj.insert("data".to_string(), data.clone());
        }
        Value::Object(obj)
    }
}

impl std::fmt::Display for ErrorData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MCP error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorData {}

/// Render an error and its `source()` chain, one cause per paragraph.
fn format_error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\n\nCaused by:\n    ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Errors produced while converting between wire payloads and typed values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The payload is neither a JSON object nor an array.
    #[error("message is not a JSON object or array")]
    NotAnObject,

    /// The payload has an `id` that is not an integer or string.
    #[error("message has an invalid id")]
    InvalidId,

    /// The payload carries both `result` and `error`.
    #[error("message has both result and error")]
    AmbiguousResponse,

    /// The payload matches none of request, response, or notification.
    #[error("message is not a request, response, or notification")]
    Unclassifiable,

    /// The method string is not part of the protocol vocabulary.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// The params failed to decode for an otherwise known method.
    #[error("invalid params for {method}: {source}")]
    InvalidParams {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// A result body failed to decode.
    #[error("invalid result payload: {0}")]
    InvalidResult(#[source] serde_json::Error),

    /// A typed value failed to encode to its wire form.
    #[error("failed to encode {kind}: {source}")]
    Encode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Root URIs must use the file scheme in this protocol version.
    #[error("root uri must start with file://, got: {0}")]
    InvalidRootUri(String),
}
