//! Initialization Types
//!
//! Types for the MCP handshake and capability negotiation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{map_omitted, meta_omitted, RequestMeta};

/// The protocol version this implementation speaks.
pub const PROTOCOL_VERSION: &str = "2025-03-26";

/// Name and version of a client or server implementation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Implementation {
    /// Programmatic name of the implementation.
    pub name: String,

    /// Version string.
    pub version: String,
}

impl Implementation {
    /// Create a new implementation info.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Capability for listing and monitoring filesystem roots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RootsCapability {
    /// Whether the client sends notifications when roots change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Capabilities the client supports, sent during initialization.
///
/// Sampling is the one wire asymmetry: the API exposes a boolean while the
/// wire carries `"sampling": {}` when enabled and omits the key otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientCapabilities {
    /// Experimental or non-standard capabilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental: Option<Map<String, Value>>,

    /// Filesystem roots listing and monitoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roots: Option<RootsCapability>,

    /// LLM sampling support from the host.
    #[serde(with = "sampling_flag", default, skip_serializing_if = "is_false")]
    pub sampling: bool,
}

impl ClientCapabilities {
    /// Enable sampling.
    pub fn enable_sampling(mut self) -> Self {
        self.sampling = true;
        self
    }

    /// Enable roots.
    pub fn enable_roots(mut self) -> Self {
        self.roots = Some(RootsCapability::default());
        self
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Wire mapping for the sampling capability: `{}` when enabled, absent when
/// not. Any present value decodes as enabled.
mod sampling_flag {
    use serde::de::IgnoredAny;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    // Only called when the flag is true; the field is skipped otherwise.
    pub fn serialize<S>(_value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_map(Some(0))?.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        IgnoredAny::deserialize(deserializer)?;
        Ok(true)
    }
}

/// Capabilities for prompt management and notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptsCapability {
    /// Whether the server sends notifications when prompts change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Capabilities for resource access and change monitoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesCapability {
    /// Whether clients can subscribe to resource change updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<bool>,

    /// Whether the server sends notifications when resources change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Capabilities for tool execution and change notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// Whether the server sends notifications when tools change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Capabilities the server supports, received during initialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerCapabilities {
    /// Experimental or non-standard capabilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experimental: Option<Map<String, Value>>,

    /// Logging capability configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Map<String, Value>>,

    /// Completion capabilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completions: Option<Map<String, Value>>,

    /// Prompt management capabilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts: Option<PromptsCapability>,

    /// Resource access capabilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesCapability>,

    /// Tool execution capabilities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Initial handshake request establishing the MCP connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitializeRequest {
    /// Protocol version the client supports.
    pub protocol_version: String,

    /// Client implementation info.
    pub client_info: Implementation,

    /// Capabilities the client supports. Always present on the wire, even
    /// when empty.
    pub capabilities: ClientCapabilities,

    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

impl InitializeRequest {
    /// Create a handshake request for the current protocol version.
    pub fn new(client_info: Implementation, capabilities: ClientCapabilities) -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            client_info,
            capabilities,
            meta: None,
        }
    }
}

/// Confirms successful initialization. Sent by the client after processing
/// the server's initialize result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InitializedNotification {
    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

/// Server's response to initialization, completing the handshake.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Protocol version the server wants to use.
    pub protocol_version: String,

    /// Capabilities the server supports.
    pub capabilities: ServerCapabilities,

    /// Server implementation info.
    pub server_info: Implementation,

    /// Optional setup or usage instructions for the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}
