// Snapshot Feed
//
// Centralized snapshot emission to whatever is presenting the data.
// Delivery is fire-and-forget broadcast in tick order: a subscriber that
// went away is pruned silently, it never fails the emitting side.

use crate::types::TelemetrySnapshot;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SnapshotFeed {
    subscribers: Arc<Mutex<Vec<Sender<TelemetrySnapshot>>>>,
}

impl SnapshotFeed {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a new consumer. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> Receiver<TelemetrySnapshot> {
        let (tx, rx) = channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }

    /// Push one snapshot to every live subscriber
    pub fn emit(&self, snapshot: &TelemetrySnapshot) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap().len()
    }
}

impl Default for SnapshotFeed {
    fn default() -> Self {
        Self::new()
    }
}
