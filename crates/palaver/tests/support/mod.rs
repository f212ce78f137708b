//! Shared test support: an in-memory transport the tests drive by hand.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use palaver::{
    ClientCapabilities, ClientSession, Implementation, Metadata, Transport, TransportError,
    TransportMessage, PROTOCOL_VERSION,
};

/// In-memory mock transport. Clones share the same queues, so tests keep one
/// handle for driving and hand another to the session.
#[derive(Clone)]
pub struct MockTransport {
    sent: Arc<Mutex<Vec<TransportMessage>>>,
    incoming_tx: mpsc::UnboundedSender<TransportMessage>,
    incoming_rx: Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<TransportMessage>>>,
    closed: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn new() -> Self {
        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            incoming_tx,
            incoming_rx: Arc::new(tokio::sync::Mutex::new(incoming_rx)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Queue a message for the session to receive.
    pub fn queue_message(&self, payload: Value) {
        let _ = self.incoming_tx.send(TransportMessage::new(payload));
    }

    /// Queue a message with transport metadata attached.
    pub fn queue_message_with_metadata(&self, payload: Value, metadata: Metadata) {
        let _ = self
            .incoming_tx
            .send(TransportMessage::with_metadata(payload, metadata));
    }

    /// Queue a JSON-RPC success response.
    pub fn queue_response(&self, request_id: i64, result: Value) {
        self.queue_message(json!({ "jsonrpc": "2.0", "id": request_id, "result": result }));
    }

    /// Queue a JSON-RPC success response with transport metadata.
    pub fn queue_response_with_metadata(&self, request_id: i64, result: Value, metadata: Metadata) {
        self.queue_message_with_metadata(
            json!({ "jsonrpc": "2.0", "id": request_id, "result": result }),
            metadata,
        );
    }

    /// Queue a JSON-RPC error response.
    pub fn queue_error(&self, request_id: i64, code: i64, message: &str) {
        self.queue_message(json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "error": { "code": code, "message": message }
        }));
    }

    /// Everything the session has sent so far.
    pub fn sent(&self) -> Vec<TransportMessage> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Payloads the session has sent so far.
    pub fn sent_payloads(&self) -> Vec<Value> {
        self.sent().into_iter().map(|m| m.payload).collect()
    }

    /// Sent payloads carrying the given method.
    pub fn sent_with_method(&self, method: &str) -> Vec<Value> {
        self.sent_payloads()
            .into_iter()
            .filter(|p| p.get("method").and_then(Value::as_str) == Some(method))
            .collect()
    }

    /// Sent payloads carrying the given response id.
    pub fn sent_with_id(&self, id: i64) -> Vec<Value> {
        self.sent_payloads()
            .into_iter()
            .filter(|p| p.get("id").and_then(Value::as_i64) == Some(id))
            .collect()
    }

    /// Whether close() has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Mark the transport closed without going through the session.
    pub fn force_close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Poll until at least `count` messages with `method` have been sent.
    pub async fn wait_for_method(&self, method: &str, count: usize) {
        for _ in 0..500 {
            if self.sent_with_method(method).len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("{} message(s) with method {:?} never sent", count, method);
    }

    /// Poll until at least `count` messages have been sent in total.
    pub async fn wait_for_sent(&self, count: usize) {
        for _ in 0..500 {
            if self.sent().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("{} sent message(s) never observed", count);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        payload: Value,
        metadata: Option<Metadata>,
    ) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TransportMessage { payload, metadata });
        Ok(())
    }

    async fn receive(&self) -> Result<TransportMessage, TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        let mut rx = self.incoming_rx.lock().await;
        // Re-check after acquiring the lock so close() observed mid-wait
        // still errors out on the next poll.
        tokio::select! {
            message = rx.recv() => message.ok_or(TransportError::Closed),
            _ = closed_watch(self.closed.clone()) => Err(TransportError::Closed),
        }
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Resolve once the closed flag flips.
async fn closed_watch(closed: Arc<AtomicBool>) {
    while !closed.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}

/// The standard server reply to `initialize` used across tests.
pub fn server_initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "logging": {} },
        "serverInfo": { "name": "test-server", "version": "1.0.0" }
    })
}

/// A fresh session over a mock transport, with default capabilities.
pub fn test_session(transport: MockTransport) -> ClientSession {
    ClientSession::new(
        transport,
        Implementation::new("test-client", "1.0.0"),
        ClientCapabilities::default(),
        None,
        vec![],
    )
}

/// A session that has already completed the handshake (request id 0).
pub async fn initialized_session() -> (ClientSession, MockTransport) {
    let transport = MockTransport::new();
    let session = test_session(transport.clone());

    let init = tokio::spawn({
        let session = session.clone();
        async move { session.initialize(None, None).await }
    });

    transport.wait_for_method("initialize", 1).await;
    transport.queue_response(0, server_initialize_result());
    init.await
        .expect("initialize task panicked")
        .expect("handshake failed");

    (session, transport)
}
