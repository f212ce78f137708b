//! Request Correlation
//!
//! Maps outstanding request ids to completion slots, and buffers responses
//! that arrive for ids nobody is waiting on.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, PoisonError};

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::oneshot;

use super::McpError;
use crate::transport::Metadata;
use crate::types::jsonrpc::RequestId;

/// What a waiting caller receives: the raw result body plus transport
/// metadata, or the server's error.
pub(crate) type ResponseOutcome = Result<(Value, Option<Metadata>), McpError>;

/// Orphan responses kept for diagnosis. Oldest entries are evicted first so a
/// noisy peer cannot grow the buffer without bound.
const ORPHAN_CAP: usize = 1024;

/// The set of in-flight outbound requests for one session.
///
/// Dropping a slot's sender releases its waiter with a shutdown error, so
/// draining is just clearing the map.
pub(crate) struct PendingRequests {
    next_id: AtomicI64,
    slots: DashMap<RequestId, oneshot::Sender<ResponseOutcome>>,
    orphans: Mutex<OrphanBuffer>,
}

impl PendingRequests {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicI64::new(0),
            slots: DashMap::new(),
            orphans: Mutex::new(OrphanBuffer::new(ORPHAN_CAP)),
        }
    }

    /// Allocate the next request id. Strictly increasing per session.
    pub(crate) fn next_id(&self) -> RequestId {
        RequestId::Number(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// How many ids have been allocated so far.
    pub(crate) fn allocated(&self) -> i64 {
        self.next_id.load(Ordering::SeqCst)
    }

    /// Insert a completion slot for an id. Must happen before the request is
    /// sent so an immediate response cannot be lost.
    pub(crate) fn register(&self, id: RequestId) -> oneshot::Receiver<ResponseOutcome> {
        let (tx, rx) = oneshot::channel();
        self.slots.insert(id, tx);
        rx
    }

    /// Remove and return the slot for an id, if one is outstanding.
    pub(crate) fn take(&self, id: &RequestId) -> Option<oneshot::Sender<ResponseOutcome>> {
        self.slots.remove(id).map(|(_, tx)| tx)
    }

    /// Drop the slot for an id without resolving it.
    pub(crate) fn remove(&self, id: &RequestId) {
        self.slots.remove(id);
    }

    /// Number of outstanding requests.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Release every waiter with a shutdown error.
    pub(crate) fn drain(&self) {
        self.slots.clear();
    }

    /// Record a response whose id matched nothing.
    pub(crate) fn buffer_orphan(&self, id: RequestId, payload: Value, metadata: Option<Metadata>) {
        self.orphans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, payload, metadata);
    }

    /// Look up a buffered orphan response by id.
    pub(crate) fn orphaned(&self, id: &RequestId) -> Option<(Value, Option<Metadata>)> {
        self.orphans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
    }
}

/// FIFO-evicting map of orphan responses.
struct OrphanBuffer {
    entries: HashMap<RequestId, (Value, Option<Metadata>)>,
    order: VecDeque<RequestId>,
    cap: usize,
}

impl OrphanBuffer {
    fn new(cap: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            cap,
        }
    }

    fn insert(&mut self, id: RequestId, payload: Value, metadata: Option<Metadata>) {
        if self.entries.insert(id.clone(), (payload, metadata)).is_none() {
            self.order.push_back(id);
        }
        while self.order.len() > self.cap {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    fn get(&self, id: &RequestId) -> Option<(Value, Option<Metadata>)> {
        self.entries.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_register_and_complete() {
        let pending = PendingRequests::new();
        let id = pending.next_id();
        let rx = pending.register(id.clone());

        let tx = pending.take(&id).expect("slot registered");
        tx.send(Ok((json!({ "ok": true }), None))).unwrap();

        let (payload, metadata) = rx.await.unwrap().unwrap();
        assert_eq!(payload["ok"], true);
        assert!(metadata.is_none());
        assert_eq!(pending.len(), 0);
    }

    #[test]
    fn test_ids_are_strictly_increasing() {
        let pending = PendingRequests::new();
        assert_eq!(pending.next_id(), RequestId::Number(0));
        assert_eq!(pending.next_id(), RequestId::Number(1));
        assert_eq!(pending.next_id(), RequestId::Number(2));
        assert_eq!(pending.allocated(), 3);
    }

    #[test]
    fn test_take_preserves_id_type() {
        let pending = PendingRequests::new();
        let _rx = pending.register(RequestId::from("abc"));

        // Matching is by value; an integer id does not collide with a string.
        assert!(pending.take(&RequestId::Number(0)).is_none());
        assert!(pending.take(&RequestId::from("abc")).is_some());
    }

    #[tokio::test]
    async fn test_drain_releases_waiters() {
        let pending = PendingRequests::new();
        let id = pending.next_id();
        let rx = pending.register(id);

        pending.drain();
        assert!(rx.await.is_err());
        assert_eq!(pending.len(), 0);
    }

    #[test]
    fn test_orphan_buffer_stores_payload_and_metadata() {
        let pending = PendingRequests::new();
        let mut metadata = Metadata::new();
        metadata.insert("meta".to_string(), json!("data"));

        pending.buffer_orphan(
            RequestId::Number(999),
            json!({ "result": { "orphaned": true } }),
            Some(metadata.clone()),
        );

        let (payload, stored) = pending.orphaned(&RequestId::Number(999)).unwrap();
        assert_eq!(payload["result"]["orphaned"], true);
        assert_eq!(stored, Some(metadata));
    }

    #[test]
    fn test_orphan_buffer_evicts_oldest() {
        let mut buffer = OrphanBuffer::new(2);
        buffer.insert(RequestId::Number(1), json!(1), None);
        buffer.insert(RequestId::Number(2), json!(2), None);
        buffer.insert(RequestId::Number(3), json!(3), None);

        assert!(buffer.get(&RequestId::Number(1)).is_none());
        assert!(buffer.get(&RequestId::Number(2)).is_some());
        assert!(buffer.get(&RequestId::Number(3)).is_some());
    }

    #[test]
    fn test_orphan_buffer_replaces_existing_id() {
        let mut buffer = OrphanBuffer::new(2);
        buffer.insert(RequestId::Number(1), json!(1), None);
        buffer.insert(RequestId::Number(1), json!("replaced"), None);

        let (payload, _) = buffer.get(&RequestId::Number(1)).unwrap();
        assert_eq!(payload, json!("replaced"));
        assert_eq!(buffer.order.len(), 1);
    }
}
