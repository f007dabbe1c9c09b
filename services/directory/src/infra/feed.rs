//! In-process change feed. Mutating handlers publish an event per write;
//! dashboard clients subscribe over SSE and refetch on receipt.

use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    pub collection: &'static str,
    pub op: &'static str,
    pub id: Uuid,
}

#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event. Having no subscribers is not an error; slow
    /// subscribers lag and miss events rather than block the writer.
    pub fn publish(&self, collection: &'static str, op: &'static str, id: Uuid) {
        let _ = self.tx.send(ChangeEvent { collection, op, id });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }
}
