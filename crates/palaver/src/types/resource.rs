//! Resource Types
//!
//! Resource definitions, listing, reading, and subscription types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::content::{Annotations, ResourceContents};
use super::{map_omitted, meta_omitted, Cursor, RequestMeta};

/// A known resource the server can read from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Resource identifier (file path, URL, etc.).
    pub uri: String,

    /// Human-readable resource name.
    pub name: String,

    /// Description for the LLM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// MIME type of the resource content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Display hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,

    /// Size in bytes, for display and token estimation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Resource {
    /// Create a new resource.
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            mime_type: None,
            annotations: None,
            size: None,
        }
    }

    /// Set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// A template for a set of resources, using RFC 6570 URI template syntax.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplate {
    /// URI template (e.g., "file:///logs/{date}.log").
    pub uri_template: String,

    /// Human-readable name for the resource type.
    pub name: String,

    /// Description for the LLM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// MIME type, if common to all matching resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Display hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// Request to list available resources with optional pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListResourcesRequest {
    /// Return results starting after this cursor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,

    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

/// Response containing available resources and pagination info.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListResourcesResult {
    pub resources: Vec<Resource>,

    /// Token for retrieving the next page, if more results exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

/// Request to list available resource templates with optional pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListResourceTemplatesRequest {
    /// Return results starting after this cursor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,

    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

/// Response containing available resource templates and pagination info.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListResourceTemplatesResult {
    pub resource_templates: Vec<ResourceTemplate>,

    /// Token for retrieving the next page, if more results exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

/// Request to read a resource at a given URI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadResourceRequest {
    /// URI of the resource to read.
    pub uri: String,

    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

impl ReadResourceRequest {
    /// Read the resource at the given URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            meta: None,
        }
    }
}

/// Response containing the contents of a resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

/// Request to subscribe to update notifications for a resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscribeRequest {
    pub uri: String,

    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

/// Request to unsubscribe from update notifications for a resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnsubscribeRequest {
    pub uri: String,

    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

/// Notification that a subscribed resource has been updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceUpdatedNotification {
    pub uri: String,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

/// Notification that the resource list has changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceListChangedNotification {
    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}
