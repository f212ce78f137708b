//! JSON-RPC 2.0 Envelopes
//!
//! Base envelope types for JSON-RPC 2.0 as used by MCP, plus the
//! classification of inbound payloads into request / response / notification.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ErrorData, ProtocolError};

/// The JSON-RPC protocol version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC version marker - always serializes as "2.0" and rejects
/// anything else on decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonRpcVersion;

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(JSONRPC_VERSION)
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == JSONRPC_VERSION {
            Ok(JsonRpcVersion)
        } else {
            Err(serde::de::Error::custom(format!(
                "expected JSON-RPC version '2.0', got '{}'",
                s
            )))
        }
    }
}

/// Request ID - a string or integer, echoed verbatim on responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl RequestId {
    /// Parse an id value, accepting only integers and strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RequestId::Number),
            Value::String(s) => Some(RequestId::String(s.clone())),
            _ => None,
        }
    }

    /// The id as a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            RequestId::Number(n) => Value::from(*n),
            RequestId::String(s) => Value::String(s.clone()),
        }
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    pub jsonrpc: JsonRpcVersion,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Create a new request envelope.
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// Wire form of the envelope. Infallible by construction.
    pub fn into_value(self) -> Value {
        let mut obj = Map::new();
        obj.insert(
            "jsonrpc".to_string(),
            Value::String(JSONRPC_VERSION.to_string()),
        );
        obj.insert("id".to_string(), self.id.to_value());
        obj.insert("method".to_string(), Value::String(self.method));
        if let Some(params) = self.params {
            obj.insert("params".to_string(), params);
        }
        Value::Object(obj)
    }
}

/// A successful JSON-RPC 2.0 response. The result body is kept as raw JSON;
/// typed decoding happens at the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: JsonRpcVersion,
    pub id: RequestId,
    pub result: Value,
}

impl JsonRpcResponse {
    /// Create a new successful response envelope.
    pub fn new(id: impl Into<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id: id.into(),
            result,
        }
    }

    /// Wire form of the envelope. Infallible by construction.
    pub fn into_value(self) -> Value {
        let mut obj = Map::new();
        obj.insert(
            "jsonrpc".to_string(),
            Value::String(JSONRPC_VERSION.to_string()),
        );
        obj.insert("id".to_string(), self.id.to_value());
        obj.insert("result".to_string(), self.result);
        Value::Object(obj)
    }
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub jsonrpc: JsonRpcVersion,
    pub id: RequestId,
    pub error: ErrorData,
}

impl JsonRpcError {
    /// Create a new error response envelope.
    pub fn new(id: impl Into<RequestId>, error: ErrorData) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            id: id.into(),
            error,
        }
    }

    /// Wire form of the envelope. Infallible by construction.
    pub fn into_value(self) -> Value {
        let mut obj = Map::new();
        obj.insert(
            "jsonrpc".to_string(),
            Value::String(JSONRPC_VERSION.to_string()),
        );
        obj.insert("id".to_string(), self.id.to_value());
        obj.insert("error".to_string(), self.error.to_protocol());
        Value::Object(obj)
    }
}

/// A JSON-RPC 2.0 notification (no response expected).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcNotification {
    pub jsonrpc: JsonRpcVersion,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Create a new notification envelope.
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JsonRpcVersion,
            method: method.into(),
            params,
        }
    }

    /// Wire form of the envelope. Infallible by construction.
    pub fn into_value(self) -> Value {
        let mut obj = Map::new();
        obj.insert(
            "jsonrpc".to_string(),
            Value::String(JSONRPC_VERSION.to_string()),
        );
        obj.insert("method".to_string(), Value::String(self.method));
        if let Some(params) = self.params {
            obj.insert("params".to_string(), params);
        }
        Value::Object(obj)
    }
}

/// A classified JSON-RPC message.
///
/// Classification is total over well-formed payloads:
/// - response: has `id` and exactly one of `result` / `error`
/// - request: has `method` and a valid `id`
/// - notification: has `method` and no `id`
///
/// Batch arrays are accepted at this boundary; consumers that operate on
/// single messages may expand or skip them.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Response(JsonRpcResponse),
    Error(JsonRpcError),
    Notification(JsonRpcNotification),
    Batch(Vec<JsonRpcMessage>),
}

impl JsonRpcMessage {
    /// Classify a raw payload. A failure here means the message cannot be
    /// processed at all; callers report it and keep going.
    pub fn from_value(value: &Value) -> Result<Self, ProtocolError> {
        if let Some(items) = value.as_array() {
            let batch = items
                .iter()
                .map(Self::from_value)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(JsonRpcMessage::Batch(batch));
        }

        let obj = value.as_object().ok_or(ProtocolError::NotAnObject)?;

        // An id that is present but not an integer or string makes the
        // message unroutable: not a valid request, and impossible to
        // correlate as a response.
        let id = match obj.get("id") {
            None => None,
            Some(raw) => Some(RequestId::from_value(raw).ok_or(ProtocolError::InvalidId)?),
        };

        let result = obj.get("result");
        let error = obj.get("error");
        let method = obj.get("method").and_then(Value::as_str);

        match (id, result, error) {
            (Some(_), Some(_), Some(_)) => Err(ProtocolError::AmbiguousResponse),
            (Some(id), Some(result), None) => Ok(JsonRpcMessage::Response(JsonRpcResponse {
                jsonrpc: JsonRpcVersion,
                id,
                result: result.clone(),
            })),
            (Some(id), None, Some(error)) => {
                let error: ErrorData =
                    serde_json::from_value(error.clone()).map_err(|source| {
                        ProtocolError::InvalidParams {
                            method: "error".to_string(),
                            source,
                        }
                    })?;
                Ok(JsonRpcMessage::Error(JsonRpcError {
                    jsonrpc: JsonRpcVersion,
                    id,
                    error,
                }))
            }
            (Some(id), None, None) => match method {
                Some(method) => Ok(JsonRpcMessage::Request(JsonRpcRequest {
                    jsonrpc: JsonRpcVersion,
                    id,
                    method: method.to_string(),
                    params: obj.get("params").cloned(),
                })),
                None => Err(ProtocolError::Unclassifiable),
            },
            (None, _, _) => match method {
                Some(method) => Ok(JsonRpcMessage::Notification(JsonRpcNotification {
                    jsonrpc: JsonRpcVersion,
                    method: method.to_string(),
                    params: obj.get("params").cloned(),
                })),
                None => Err(ProtocolError::Unclassifiable),
            },
        }
    }
}
