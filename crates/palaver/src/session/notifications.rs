//! Notification Queue
//!
//! Inbound server notifications are decoded by the receive loop and parked
//! here until the caller consumes them.

use tokio::sync::mpsc;
use tracing::debug;

use crate::types::unions::ServerNotification;

/// Create the queue and the loop-side sink feeding it.
pub(crate) fn channel() -> (NotificationSink, Notifications) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        NotificationSink { tx },
        Notifications {
            rx: tokio::sync::Mutex::new(rx),
        },
    )
}

/// Loop-side producer half of the notification queue.
pub(crate) struct NotificationSink {
    tx: mpsc::UnboundedSender<ServerNotification>,
}

impl NotificationSink {
    pub(crate) fn push(&self, notification: ServerNotification) {
        if self.tx.send(notification).is_err() {
            debug!("notification queue receiver dropped");
        }
    }
}

/// Consumer-visible queue of parsed inbound notifications, in arrival order.
pub struct Notifications {
    rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<ServerNotification>>,
}

impl Notifications {
    /// Wait for the next notification.
    pub async fn recv(&self) -> Option<ServerNotification> {
        self.rx.lock().await.recv().await
    }

    /// Take the next notification if one is already queued.
    pub async fn try_recv(&self) -> Option<ServerNotification> {
        self.rx.lock().await.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::common::ProgressNotification;
    use crate::types::ProgressToken;

    fn progress(token: i64) -> ServerNotification {
        ServerNotification::Progress(ProgressNotification {
            progress_token: ProgressToken::Number(token),
            progress: 1.0,
            total: 2.0,
            message: None,
            meta: None,
        })
    }

    #[tokio::test]
    async fn test_notifications_arrive_in_order() {
        let (sink, queue) = channel();
        sink.push(progress(1));
        sink.push(progress(2));

        match queue.recv().await {
            Some(ServerNotification::Progress(n)) => {
                assert_eq!(n.progress_token, ProgressToken::Number(1));
            }
            other => panic!("unexpected {:?}", other),
        }
        match queue.recv().await {
            Some(ServerNotification::Progress(n)) => {
                assert_eq!(n.progress_token, ProgressToken::Number(2));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_try_recv_on_empty_queue() {
        let (_sink, queue) = channel();
        assert!(queue.try_recv().await.is_none());
    }
}
