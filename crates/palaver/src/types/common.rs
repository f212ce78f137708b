//! Common Protocol Types
//!
//! Ping, cancellation, progress, and the empty result shared by several
//! operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::jsonrpc::RequestId;
use super::{map_omitted, meta_omitted, ProgressToken, RequestMeta};

/// Heartbeat to check connection health. Sent by client or server and
/// answered with an empty result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PingRequest {
    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

/// Result that indicates success but carries no data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmptyResult {
    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

/// Notifies the peer that a request was terminated before completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CancelledNotification {
    /// ID of the cancelled request.
    pub request_id: RequestId,

    /// Optional explanation for the cancellation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}

impl CancelledNotification {
    /// Cancel the given request with a reason.
    pub fn new(request_id: impl Into<RequestId>, reason: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            reason: Some(reason.into()),
            meta: None,
        }
    }
}

/// Reports progress on a long-running operation, linked back to the
/// originating request by its progress token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressNotification {
    /// Token identifying the operation being tracked.
    pub progress_token: ProgressToken,

    /// Current progress amount.
    pub progress: f64,

    /// Total expected amount when complete.
    pub total: f64,

    /// Optional progress description or status message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}
