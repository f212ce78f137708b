//! Inbound Dispatch
//!
//! The receive loop owns `transport.receive`. Each message is classified and
//! routed: responses complete pending slots, requests are handled on
//! detached tasks so slow handlers cannot block other traffic, and
//! notifications are parsed and queued.
//!
//! Per-message failures are logged and skipped; only a transport failure
//! ends the loop, which then drains every waiter and stops the session.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::{McpError, SessionInner};
use crate::transport::{Metadata, TransportMessage};
use crate::types::common::EmptyResult;
use crate::types::error::{
    ErrorData, ProtocolError, INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND,
};
use crate::types::jsonrpc::{
    JsonRpcError, JsonRpcMessage, JsonRpcRequest, JsonRpcResponse, RequestId,
};
use crate::types::roots::ListRootsResult;
use crate::types::unions::{ClientResult, ServerNotification, ServerRequest};

/// The session's receive loop. Runs until the transport fails or the session
/// is stopped, then tears everything down.
pub(crate) async fn run(inner: Arc<SessionInner>) {
    loop {
        let message = match inner.transport.receive().await {
            Ok(message) => message,
            Err(e) => {
                if !inner.is_stopped() {
                    warn!("receive loop exiting: {e}");
                }
                break;
            }
        };
        handle_message(&inner, message);
    }
    inner.shutdown(false).await;
}

/// Classify and route one inbound message. Never blocks on user code.
fn handle_message(inner: &Arc<SessionInner>, message: TransportMessage) {
    let TransportMessage { payload, metadata } = message;

    let classified = match JsonRpcMessage::from_value(&payload) {
        Ok(classified) => classified,
        Err(e) => {
            warn!("discarding malformed message: {e}");
            return;
        }
    };

    match classified {
        JsonRpcMessage::Response(response) => {
            complete(inner, response.id, Ok((response.result, metadata)), payload);
        }
        JsonRpcMessage::Error(error) => {
            let id = error.id;
            let outcome = Err(McpError {
                error: error.error,
                transport_metadata: metadata.clone(),
            });
            complete(inner, id, outcome, payload);
        }
        JsonRpcMessage::Request(request) => {
            let inner = Arc::clone(inner);
            tokio::spawn(async move {
                handle_request(inner, request, metadata).await;
            });
        }
        JsonRpcMessage::Notification(notification) => {
            match ServerNotification::from_parts(
                &notification.method,
                notification.params.as_ref(),
            ) {
                Ok(parsed) => inner.notifications_sink.push(parsed),
                Err(ProtocolError::UnknownMethod(method)) => {
                    debug!(%method, "ignoring unknown notification");
                }
                Err(e) => warn!("failed to decode notification: {e}"),
            }
        }
        JsonRpcMessage::Batch(_) => {
            debug!("batch payloads are expanded by the transport; ignoring");
        }
    }
}

/// Resolve a pending slot, or buffer the response if nothing is waiting.
fn complete(
    inner: &SessionInner,
    id: RequestId,
    outcome: Result<(Value, Option<Metadata>), McpError>,
    raw_payload: Value,
) {
    match inner.pending.take(&id) {
        Some(slot) => {
            // A dropped receiver means the caller gave up; nothing to do.
            let _ = slot.send(outcome);
        }
        None => {
            debug!(id = %id, "buffering response with no matching request");
            let metadata = match &outcome {
                Ok((_, metadata)) => metadata.clone(),
                Err(e) => e.transport_metadata.clone(),
            };
            inner.pending.buffer_orphan(id, raw_payload, metadata);
        }
    }
}

/// Handle one server-initiated request and send exactly one response with
/// the same id.
async fn handle_request(
    inner: Arc<SessionInner>,
    request: JsonRpcRequest,
    _metadata: Option<Metadata>,
) {
    let id = request.id.clone();
    let reply = match respond(&inner, request).await {
        Ok(result) => JsonRpcResponse::new(id.clone(), result).into_value(),
        Err(error) => JsonRpcError::new(id.clone(), error).into_value(),
    };

    if let Err(e) = inner.transport.send(reply, None).await {
        warn!(id = %id, "failed to send response: {e}");
    }
}

/// Route a server request to its handler, gated on declared capabilities.
async fn respond(inner: &SessionInner, request: JsonRpcRequest) -> Result<Value, ErrorData> {
    let parsed = match ServerRequest::from_parts(&request.method, request.params.as_ref()) {
        Ok(parsed) => parsed,
        Err(ProtocolError::UnknownMethod(method)) => {
            return Err(ErrorData::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", method),
            ));
        }
        Err(e) => return Err(ErrorData::new(INVALID_PARAMS, e.to_string())),
    };

    let result = match parsed {
        ServerRequest::Ping(_) => ClientResult::Empty(EmptyResult::default()),
        ServerRequest::ListRoots(_) => {
            if inner.capabilities.roots.is_none() {
                return Err(ErrorData::new(
                    METHOD_NOT_FOUND,
                    "Client does not support roots capability",
                ));
            }
            ClientResult::ListRoots(ListRootsResult::new(inner.roots.clone()))
        }
        ServerRequest::CreateMessage(request) => {
            if !inner.capabilities.sampling {
                return Err(ErrorData::new(
                    METHOD_NOT_FOUND,
                    "Client does not support sampling capability",
                ));
            }
            let handler = inner.sampling_handler.as_ref().ok_or_else(|| {
                ErrorData::new(
                    INTERNAL_ERROR,
                    "Sampling capability enabled but no sampling handler configured",
                )
            })?;
            match handler.create_message(*request).await {
                Ok(result) => ClientResult::CreateMessage(Box::new(result)),
                Err(e) => {
                    return Err(ErrorData::new(INTERNAL_ERROR, format!("{e:#}")));
                }
            }
        }
    };

    result
        .to_protocol()
        .map_err(|e| ErrorData::new(INTERNAL_ERROR, e.to_string()))
}
