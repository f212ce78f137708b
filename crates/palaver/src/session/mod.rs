//! Client Session
//!
//! The protocol engine over one transport: handshake gating, request and
//! response correlation, inbound request handling, and the notification
//! queue.
//!
//! One background task owns `transport.receive` and routes every inbound
//! message; callers issue requests concurrently and are resolved through
//! per-request completion slots. A session is single-use: once stopped it
//! cannot be restarted.

mod inbound;
mod notifications;
mod pending;

pub use notifications::Notifications;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::transport::{Metadata, Transport, TransportError};
use crate::types::common::CancelledNotification;
use crate::types::error::{ErrorData, ProtocolError};
use crate::types::initialize::{
    ClientCapabilities, Implementation, InitializeRequest, InitializeResult,
    InitializedNotification, PROTOCOL_VERSION,
};
use crate::types::jsonrpc::{JsonRpcNotification, JsonRpcRequest, RequestId};
use crate::types::roots::Root;
use crate::types::sampling::{CreateMessageRequest, CreateMessageResult};
use crate::types::unions::{
    result_from_protocol, result_to_protocol, ClientNotification, ClientRequest, McpRequest,
};
use pending::PendingRequests;

/// Default timeout for requests and initialization.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A protocol-level error returned by the server, with the transport
/// metadata that arrived on the response.
#[derive(Debug, thiserror::Error)]
#[error("server returned an error: {error}")]
pub struct McpError {
    pub error: ErrorData,
    pub transport_metadata: Option<Metadata>,
}

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The transport failed or was closed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// No response arrived within the caller's timeout. A cancellation
    /// notification was emitted before this was returned.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The handshake did not complete within its timeout.
    #[error("initialization timed out after {0:?}")]
    InitializeTimeout(Duration),

    /// The server negotiated a protocol version we do not speak.
    #[error("protocol version mismatch: client supports {client}, server sent {server}")]
    VersionMismatch { client: String, server: String },

    /// The session was stopped while the operation was outstanding.
    #[error("session stopped")]
    Stopped,

    /// The server answered with a protocol error.
    #[error(transparent)]
    Rpc(#[from] McpError),

    /// A payload could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Caller-supplied responder for server-initiated sampling requests.
///
/// Invoked concurrently with other session activity; implementations must be
/// reentrant. An `Err` becomes an INTERNAL_ERROR response carrying the error
/// text and never tears down the session.
#[async_trait]
pub trait SamplingHandler: Send + Sync {
    async fn create_message(
        &self,
        request: CreateMessageRequest,
    ) -> anyhow::Result<CreateMessageResult>;
}

/// An MCP client session over one transport.
///
/// Cloning is cheap and shares the same underlying session.
#[derive(Clone)]
pub struct ClientSession {
    inner: Arc<SessionInner>,
}

pub(crate) struct SessionInner {
    transport: Arc<dyn Transport>,
    client_info: Implementation,
    capabilities: ClientCapabilities,
    roots: Vec<Root>,
    sampling_handler: Option<Arc<dyn SamplingHandler>>,
    pending: PendingRequests,
    notifications_sink: notifications::NotificationSink,
    notifications: Notifications,
    stopped: AtomicBool,
    loop_task: StdMutex<Option<JoinHandle<()>>>,
    init: OnceCell<InitializeResult>,
}

impl ClientSession {
    /// Create a session over the given transport.
    ///
    /// `sampling_handler` backs inbound `sampling/createMessage` requests
    /// when the sampling capability is enabled; `roots` backs inbound
    /// `roots/list` when the roots capability is declared.
    pub fn new(
        transport: impl Transport + 'static,
        client_info: Implementation,
        capabilities: ClientCapabilities,
        sampling_handler: Option<Arc<dyn SamplingHandler>>,
        roots: Vec<Root>,
    ) -> Self {
        let (sink, queue) = notifications::channel();
        Self {
            inner: Arc::new(SessionInner {
                transport: Arc::new(transport),
                client_info,
                capabilities,
                roots,
                sampling_handler,
                pending: PendingRequests::new(),
                notifications_sink: sink,
                notifications: queue,
                stopped: AtomicBool::new(false),
                loop_task: StdMutex::new(None),
                init: OnceCell::new(),
            }),
        }
    }

    /// The queue of inbound server notifications, in arrival order.
    pub fn notifications(&self) -> &Notifications {
        &self.inner.notifications
    }

    /// The cached handshake result, if initialization has completed.
    pub fn initialize_result(&self) -> Option<&InitializeResult> {
        self.inner.init.get()
    }

    /// Whether the session has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.inner.is_stopped()
    }

    /// Spawn the receive loop if it is not already running. Idempotent;
    /// called implicitly by the request paths.
    pub fn start(&self) -> Result<(), SessionError> {
        ensure_started(&self.inner)
    }

    /// Stop the session: cancel the receive loop, release every waiting
    /// caller with a shutdown error, and close the transport. Idempotent and
    /// infallible.
    pub async fn stop(&self) {
        self.inner.shutdown(true).await;
    }

    /// Run the handshake, or join/return the one already done.
    ///
    /// Concurrent callers share a single in-flight attempt; after success
    /// the cached result is returned with no further I/O. On timeout a
    /// cancellation notification is emitted and the session is stopped; on
    /// version mismatch or transport failure the session is stopped and the
    /// error propagated.
    pub async fn initialize(
        &self,
        metadata: Option<Metadata>,
        timeout: Option<Duration>,
    ) -> Result<InitializeResult, SessionError> {
        let timeout = timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        self.inner
            .init
            .get_or_try_init(|| self.handshake(metadata, timeout))
            .await
            .map(Clone::clone)
    }

    async fn handshake(
        &self,
        metadata: Option<Metadata>,
        timeout: Duration,
    ) -> Result<InitializeResult, SessionError> {
        let request = ClientRequest::Initialize(InitializeRequest::new(
            self.inner.client_info.clone(),
            self.inner.capabilities.clone(),
        ));

        let outcome = self
            .request_raw(request, metadata, timeout, "Initialization timed out")
            .await;
        let (payload, _metadata) = match outcome {
            Ok(response) => response,
            Err(e) => {
                self.stop().await;
                return Err(match e {
                    SessionError::Timeout(elapsed) => SessionError::InitializeTimeout(elapsed),
                    other => other,
                });
            }
        };

        let result: InitializeResult = match result_from_protocol(&payload) {
            Ok(result) => result,
            Err(e) => {
                self.stop().await;
                return Err(e.into());
            }
        };

        if result.protocol_version != PROTOCOL_VERSION {
            self.stop().await;
            return Err(SessionError::VersionMismatch {
                client: PROTOCOL_VERSION.to_string(),
                server: result.protocol_version,
            });
        }

        if let Err(e) = self
            .send_notification(
                ClientNotification::Initialized(InitializedNotification::default()),
                None,
            )
            .await
        {
            self.stop().await;
            return Err(e);
        }

        debug!(server = %result.server_info.name, "session initialized");
        Ok(result)
    }

    /// Send a request and await its response under the given timeout
    /// (default 30 s).
    ///
    /// Ensures the handshake has completed first, initializing with default
    /// parameters if necessary. Returns the raw result body plus the
    /// transport metadata that arrived with the response.
    pub async fn send_request(
        &self,
        request: ClientRequest,
        metadata: Option<Metadata>,
        timeout: Option<Duration>,
    ) -> Result<(Value, Option<Metadata>), SessionError> {
        // An initialize request routed here joins the normal handshake path
        // so it can never be sent twice.
        if matches!(request, ClientRequest::Initialize(_)) {
            let result = self.initialize(metadata, timeout).await?;
            return Ok((result_to_protocol(&result)?, None));
        }

        self.initialize(None, None).await?;
        self.request_raw(
            request,
            metadata,
            timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            "Request timed out",
        )
        .await
    }

    /// Send a request and decode the result into its paired type.
    pub async fn typed_request<R>(
        &self,
        request: R,
        metadata: Option<Metadata>,
        timeout: Option<Duration>,
    ) -> Result<(R::Result, Option<Metadata>), SessionError>
    where
        R: McpRequest + Into<ClientRequest>,
    {
        let (payload, response_metadata) =
            self.send_request(request.into(), metadata, timeout).await?;
        Ok((result_from_protocol(&payload)?, response_metadata))
    }

    /// Send a one-way notification. Does not wait for anything.
    pub async fn send_notification(
        &self,
        notification: ClientNotification,
        metadata: Option<Metadata>,
    ) -> Result<(), SessionError> {
        let (method, params) = notification.wire_parts()?;
        let payload = JsonRpcNotification::new(method, params).into_value();
        self.inner.transport.send(payload, metadata).await?;
        Ok(())
    }

    /// Correlated send: allocate an id, register a completion slot, send,
    /// and await the outcome. On timeout (or if the caller drops this
    /// future) the slot is removed and a cancellation notification emitted.
    async fn request_raw(
        &self,
        request: ClientRequest,
        metadata: Option<Metadata>,
        timeout: Duration,
        timeout_reason: &'static str,
    ) -> Result<(Value, Option<Metadata>), SessionError> {
        ensure_started(&self.inner)?;

        let id = self.inner.pending.next_id();
        let (method, params) = request.wire_parts()?;
        let payload = JsonRpcRequest::new(id.clone(), method, params).into_value();

        // Register before sending so an immediate response cannot be lost.
        let rx = self.inner.pending.register(id.clone());
        let mut guard = CancelGuard::new(Arc::clone(&self.inner), id.clone());

        if let Err(e) = self.inner.transport.send(payload, metadata).await {
            guard.disarm();
            self.inner.pending.remove(&id);
            return Err(e.into());
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(Ok(response))) => {
                guard.disarm();
                Ok(response)
            }
            Ok(Ok(Err(rpc_error))) => {
                guard.disarm();
                Err(SessionError::Rpc(rpc_error))
            }
            Ok(Err(_slot_dropped)) => {
                guard.disarm();
                Err(SessionError::Stopped)
            }
            Err(_elapsed) => {
                guard.disarm();
                self.inner.pending.remove(&id);
                self.inner.send_cancelled(&id, timeout_reason).await;
                Err(SessionError::Timeout(timeout))
            }
        }
    }

    /// Number of requests currently awaiting a response.
    pub fn pending_requests(&self) -> usize {
        self.inner.pending.len()
    }

    /// Look up a buffered orphan response by id.
    pub fn orphaned_response(&self, id: &RequestId) -> Option<(Value, Option<Metadata>)> {
        self.inner.pending.orphaned(id)
    }
}

/// Spawn the receive loop for a session if it is not already running.
fn ensure_started(inner: &Arc<SessionInner>) -> Result<(), SessionError> {
    if inner.is_stopped() {
        return Err(SessionError::Stopped);
    }
    let mut guard = inner
        .loop_task
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if guard.is_none() {
        *guard = Some(tokio::spawn(inbound::run(Arc::clone(inner))));
    }
    Ok(())
}

impl SessionInner {
    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Tear the session down. `abort_loop` is false when the receive loop
    /// itself is shutting down, so it is not cancelled mid-cleanup.
    pub(crate) async fn shutdown(&self, abort_loop: bool) {
        self.stopped.store(true, Ordering::SeqCst);

        let task = self
            .loop_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if abort_loop {
            if let Some(task) = task {
                task.abort();
            }
        }

        self.pending.drain();

        if let Err(e) = self.transport.close().await {
            debug!("transport close failed during shutdown: {e}");
        }
    }

    /// Best-effort `notifications/cancelled` emission.
    pub(crate) async fn send_cancelled(&self, id: &RequestId, reason: &str) {
        let notification =
            ClientNotification::Cancelled(CancelledNotification::new(id.clone(), reason));
        match notification.wire_parts() {
            Ok((method, params)) => {
                let payload = JsonRpcNotification::new(method, params).into_value();
                if let Err(e) = self.transport.send(payload, None).await {
                    debug!(id = %id, "failed to send cancellation: {e}");
                }
            }
            Err(e) => debug!(id = %id, "failed to encode cancellation: {e}"),
        }
    }
}

/// Removes the pending slot and emits a cancellation if a `request_raw`
/// future is dropped before it resolves.
struct CancelGuard {
    inner: Arc<SessionInner>,
    id: Option<RequestId>,
}

impl CancelGuard {
    fn new(inner: Arc<SessionInner>, id: RequestId) -> Self {
        Self {
            inner,
            id: Some(id),
        }
    }

    fn disarm(&mut self) {
        self.id = None;
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        self.inner.pending.remove(&id);
        if self.inner.is_stopped() {
            return;
        }
        let inner = Arc::clone(&self.inner);
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                inner.send_cancelled(&id, "Request cancelled").await;
            });
        }
    }
}
