//! Outbound request correlation: ordering, timeouts, orphans, server
//! errors, and notification sending.

mod support;

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;

use palaver::{
    CancelledNotification, ClientNotification, ClientRequest, EmptyResult, Metadata,
    PingRequest, RequestId, ServerNotification, SessionError,
};
use support::{initialized_session, MockTransport};

fn ping() -> ClientRequest {
    ClientRequest::Ping(PingRequest::default())
}

#[tokio::test]
async fn out_of_order_responses_reach_the_right_callers() {
    let (session, transport) = initialized_session().await;

    // Ids 1 and 2 (the handshake used 0). Spawn sequentially so the id
    // each caller holds is deterministic.
    let task1 = tokio::spawn({
        let session = session.clone();
        async move { session.send_request(ping(), None, None).await }
    });
    transport.wait_for_method("ping", 1).await;

    let task2 = tokio::spawn({
        let session = session.clone();
        async move { session.send_request(ping(), None, None).await }
    });
    transport.wait_for_method("ping", 2).await;

    // Reply to the second request first.
    transport.queue_response(2, json!({ "value": "second" }));
    transport.queue_response(1, json!({ "value": "first" }));

    let (payload1, _) = task1.await.unwrap().unwrap();
    let (payload2, _) = task2.await.unwrap().unwrap();

    // Each caller received the payload matching its own id despite the
    // reversed arrival order.
    assert_eq!(payload1, json!({ "value": "first" }));
    assert_eq!(payload2, json!({ "value": "second" }));
    assert_eq!(session.pending_requests(), 0);
}

#[tokio::test]
async fn response_metadata_is_handed_back_to_the_caller() {
    let (session, transport) = initialized_session().await;

    let task = tokio::spawn({
        let session = session.clone();
        async move { session.send_request(ping(), None, None).await }
    });

    transport.wait_for_method("ping", 1).await;

    let mut metadata = Metadata::new();
    metadata.insert("test".to_string(), json!("meta"));
    transport.queue_response_with_metadata(1, json!({ "data": "test" }), metadata.clone());

    let (payload, response_metadata) = task.await.unwrap().unwrap();
    assert_eq!(payload, json!({ "data": "test" }));
    assert_eq!(response_metadata, Some(metadata));
}

#[tokio::test]
async fn server_error_resolves_caller_with_rpc_error() {
    let (session, transport) = initialized_session().await;

    let task = tokio::spawn({
        let session = session.clone();
        async move { session.send_request(ping(), None, None).await }
    });

    transport.wait_for_method("ping", 1).await;
    transport.queue_error(1, -1, "test error");

    let err = task.await.unwrap().unwrap_err();
    match err {
        SessionError::Rpc(rpc) => {
            assert_eq!(rpc.error.code, -1);
            assert_eq!(rpc.error.message, "test error");
        }
        other => panic!("expected rpc error, got {other:?}"),
    }

    // The failed exchange leaves nothing pending; the session is intact.
    assert_eq!(session.pending_requests(), 0);
    assert!(!session.is_stopped());
}

#[tokio::test]
async fn request_timeout_sends_cancellation_then_recovers() {
    let (session, transport) = initialized_session().await;

    let err = session
        .send_request(ping(), None, Some(Duration::from_nanos(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Timeout(_)));
    assert_eq!(session.pending_requests(), 0);

    let cancellations = transport.sent_with_method("notifications/cancelled");
    assert_eq!(cancellations.len(), 1);
    assert_eq!(cancellations[0]["params"]["requestId"], 1);
    assert_eq!(cancellations[0]["params"]["reason"], "Request timed out");

    // A subsequent ping on the same session succeeds.
    let task = tokio::spawn({
        let session = session.clone();
        async move { session.send_request(ping(), None, None).await }
    });
    transport.wait_for_method("ping", 2).await;
    transport.queue_response(2, json!({}));

    let (payload, _) = task.await.unwrap().unwrap();
    assert_eq!(payload, json!({}));
    assert!(!session.is_stopped());
}

#[tokio::test]
async fn orphan_response_is_buffered_and_loop_survives() {
    let (session, transport) = initialized_session().await;

    let mut metadata = Metadata::new();
    metadata.insert("meta".to_string(), json!("data"));
    transport.queue_message_with_metadata(
        json!({ "jsonrpc": "2.0", "id": 999, "result": { "orphaned": true } }),
        metadata.clone(),
    );

    // Give the loop a moment to process the orphan.
    for _ in 0..100 {
        if session.orphaned_response(&RequestId::Number(999)).is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let (payload, stored) = session
        .orphaned_response(&RequestId::Number(999))
        .expect("orphan buffered");
    assert_eq!(payload["result"]["orphaned"], true);
    assert_eq!(stored, Some(metadata));

    // A normal exchange still works afterwards.
    let task = tokio::spawn({
        let session = session.clone();
        async move { session.send_request(ping(), None, None).await }
    });
    transport.wait_for_method("ping", 1).await;
    transport.queue_response(1, json!({}));
    assert!(task.await.unwrap().is_ok());
}

#[tokio::test]
async fn malformed_response_does_not_kill_the_loop() {
    let (session, transport) = initialized_session().await;

    // Missing both result and error.
    transport.queue_message(json!({ "jsonrpc": "2.0", "id": 123 }));

    let task = tokio::spawn({
        let session = session.clone();
        async move { session.send_request(ping(), None, None).await }
    });
    transport.wait_for_method("ping", 1).await;
    transport.queue_response(1, json!({}));

    assert!(task.await.unwrap().is_ok());
    assert!(!session.is_stopped());
}

#[tokio::test]
async fn typed_request_decodes_paired_result() {
    let (session, transport) = initialized_session().await;

    let task = tokio::spawn({
        let session = session.clone();
        async move {
            session
                .typed_request(PingRequest::default(), None, None)
                .await
        }
    });

    transport.wait_for_method("ping", 1).await;
    transport.queue_response(1, json!({}));

    let (result, _): (EmptyResult, _) = task.await.unwrap().unwrap();
    assert_eq!(result, EmptyResult::default());
}

#[tokio::test]
async fn send_notification_writes_wire_shape() {
    let (session, transport) = initialized_session().await;

    session
        .send_notification(
            ClientNotification::Cancelled(CancelledNotification::new(42, "test")),
            None,
        )
        .await
        .unwrap();

    let sent = transport.sent_payloads();
    let last = sent.last().unwrap();
    assert_eq!(last["method"], "notifications/cancelled");
    assert_eq!(last["params"]["requestId"], 42);
    assert_eq!(last["params"]["reason"], "test");
    assert!(last.get("id").is_none());
}

#[tokio::test]
async fn send_notification_propagates_transport_errors() {
    let (session, transport) = initialized_session().await;
    transport.force_close();

    let err = session
        .send_notification(
            ClientNotification::Cancelled(CancelledNotification::new(42, "test")),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Transport(_)));
}

#[tokio::test]
async fn inbound_notifications_are_parsed_and_queued_in_order() {
    let (session, transport) = initialized_session().await;

    transport.queue_message(json!({
        "jsonrpc": "2.0",
        "method": "notifications/message",
        "params": { "level": "info", "data": { "message": "test log" } }
    }));
    transport.queue_message(json!({
        "jsonrpc": "2.0",
        "method": "notifications/tools/list_changed"
    }));

    match session.notifications().recv().await {
        Some(ServerNotification::LoggingMessage(n)) => {
            assert_eq!(n.data["message"], "test log");
        }
        other => panic!("expected logging message, got {other:?}"),
    }
    match session.notifications().recv().await {
        Some(ServerNotification::ToolListChanged(_)) => {}
        other => panic!("expected tool list changed, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_notification_methods_are_dropped() {
    let (session, transport) = initialized_session().await;

    transport.queue_message(json!({
        "jsonrpc": "2.0",
        "method": "notifications/unknown",
        "params": {}
    }));
    transport.queue_message(json!({
        "jsonrpc": "2.0",
        "method": "notifications/message",
        "params": { "level": "info", "data": "after" }
    }));

    // Only the known notification comes out of the queue.
    match session.notifications().recv().await {
        Some(ServerNotification::LoggingMessage(n)) => assert_eq!(n.data, json!("after")),
        other => panic!("expected logging message, got {other:?}"),
    }
    assert!(session.notifications().try_recv().await.is_none());
    assert!(!session.is_stopped());
}

#[tokio::test]
async fn progress_token_rides_in_request_meta() {
    let (session, transport) = initialized_session().await;

    let request = ClientRequest::Ping(PingRequest {
        meta: Some(palaver::RequestMeta::progress("tok-7")),
    });

    let task = tokio::spawn({
        let session = session.clone();
        async move { session.send_request(request, None, None).await }
    });

    transport.wait_for_method("ping", 1).await;
    let sent = transport.sent_with_method("ping");
    assert_eq!(sent[0]["params"]["_meta"]["progressToken"], "tok-7");

    transport.queue_response(1, json!({}));
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn outbound_metadata_reaches_the_transport() {
    let (session, transport) = initialized_session().await;

    let mut metadata = Metadata::new();
    metadata.insert("authorization".to_string(), json!("Bearer x"));

    let task = tokio::spawn({
        let session = session.clone();
        let metadata = metadata.clone();
        async move { session.send_request(ping(), Some(metadata), None).await }
    });

    transport.wait_for_method("ping", 1).await;
    let sent = transport.sent();
    let ping_message = sent
        .iter()
        .find(|m| m.payload["method"] == "ping")
        .expect("ping sent");
    assert_eq!(ping_message.metadata, Some(metadata));

    transport.queue_response(1, json!({}));
    task.await.unwrap().unwrap();
}
