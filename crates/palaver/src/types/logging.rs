//! Logging Types
//!
//! Log level control and the log messages servers push to the client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{map_omitted, meta_omitted, RequestMeta};

/// Level of logging the client wants to receive from the server.
///
/// The eight levels mirror syslog severities, ordered least to most severe.
/// Requesting a level asks for messages at that level and everything more
/// severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl LogLevel {
    /// Every level, least to most severe.
    pub const ALL: [LogLevel; 8] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Notice,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
        LogLevel::Alert,
        LogLevel::Emergency,
    ];

    /// Whether a message at `level` should be delivered when this level was
    /// requested.
    pub fn includes(&self, level: LogLevel) -> bool {
        level >= *self
    }

    /// The nearest `tracing` level, for forwarding server log messages into
    /// the host's subscriber. Syslog severities above error all collapse to
    /// error.
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info | LogLevel::Notice => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error | LogLevel::Critical | LogLevel::Alert | LogLevel::Emergency => {
                tracing::Level::ERROR
            }
        }
    }
}

/// Request the server to send logs at `level` and more severe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetLevelRequest {
    pub level: LogLevel,

    #[serde(rename = "_meta", default, skip_serializing_if = "meta_omitted")]
    pub meta: Option<RequestMeta>,
}

impl SetLevelRequest {
    /// Request logs at the given level and above.
    pub fn new(level: LogLevel) -> Self {
        Self { level, meta: None }
    }
}

/// Log message sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingMessageNotification {
    /// Severity of the log message.
    pub level: LogLevel,

    /// Name of the logger issuing the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger: Option<String>,

    /// Any JSON-serializable data to log.
    pub data: Value,

    #[serde(rename = "_meta", default, skip_serializing_if = "map_omitted")]
    pub meta: Option<Map<String, Value>>,
}
