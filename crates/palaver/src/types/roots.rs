//! Roots Types
//!
//! Filesystem roots the client exposes to the server.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ProtocolError;
use super::{map_omitted, meta_omitted, RequestMeta};

/// A filesystem root exposed by the client. URIs must use the `file://`
/// scheme in this protocol version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Root {
    pub uri: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Root {
    /// Create a root, validating the URI scheme.
    pub fn new(uri: impl Into<String>, name: Option<String>) -> Result<Self, ProtocolError> {
        let uri = uri.into();
        if !uri.starts_with("file://") {
            return Err(ProtocolError::InvalidRootUri(uri));
        }
        Ok(Self { uri, name })
    }
}

/// Server-to-client request to list the configured roots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListRootsRequest {
    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

/// Response containing the configured roots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListRootsResult {
    pub roots: Vec<Root>,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

impl ListRootsResult {
    /// Wrap a roots list.
    pub fn new(roots: Vec<Root>) -> Self {
        Self { roots, meta: None }
    }
}

/// Notification that the client's roots have changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RootsListChangedNotification {
    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_requires_file_scheme() {
        assert!(Root::new("file:///workspace", None).is_ok());
        assert!(Root::new("https://example.com", None).is_err());
    }

    #[test]
    fn test_list_roots_result_shape() {
        let root = Root::new("file:///test", Some("test".to_string())).unwrap();
        let result = ListRootsResult::new(vec![root]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            json!({ "roots": [{ "uri": "file:///test", "name": "test" }] })
        );
    }
}
