//! Transport Layer
//!
//! The session sits on top of an abstract duplex message carrier. A transport
//! moves already-decoded JSON payloads in both directions and knows nothing
//! about protocol semantics or request correlation.
//!
//! Per-message metadata (e.g., HTTP headers) is opaque to the session: it is
//! attached to outbound messages by the caller and handed back alongside
//! inbound responses.

mod stdio;

pub use stdio::StdioTransport;

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Opaque per-message metadata.
pub type Metadata = Map<String, Value>;

/// A message received from the transport: the decoded JSON payload plus any
/// transport-level metadata that arrived with it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportMessage {
    pub payload: Value,
    pub metadata: Option<Metadata>,
}

impl TransportMessage {
    /// A message with no transport metadata.
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            metadata: None,
        }
    }

    /// A message with transport metadata.
    pub fn with_metadata(payload: Value, metadata: Metadata) -> Self {
        Self {
            payload,
            metadata: Some(metadata),
        }
    }
}

/// Errors surfaced by a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The transport has been closed; no further traffic is possible.
    #[error("transport closed")]
    Closed,

    /// The underlying I/O channel failed.
    #[error("transport i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// An outbound payload could not be encoded.
    #[error("failed to encode outbound message: {0}")]
    Encode(#[source] serde_json::Error),

    /// An inbound frame was not valid JSON.
    #[error("invalid json from peer: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Abstract duplex message carrier.
///
/// Implementations handle framing, I/O, and reconnection policy. The session
/// guarantees that only its receive loop calls `receive`, while `send` may be
/// called concurrently from request, response, and notification paths.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one message. Fails when the transport is closed or the underlying
    /// I/O fails.
    async fn send(&self, payload: Value, metadata: Option<Metadata>)
        -> Result<(), TransportError>;

    /// Receive the next message, suspending until one is available. Fails
    /// when the transport is closed.
    async fn receive(&self) -> Result<TransportMessage, TransportError>;

    /// Close the transport. Idempotent.
    async fn close(&self) -> Result<(), TransportError>;
}
