//! EventNotifier - out-of-band signal fan-out
//!
//! Fire-and-forget, at-least-once delivery to every subscriber. `notify`
//! never blocks or fails the caller; a send with no live receivers is
//! silently dropped, and lagging receivers lose the oldest events first.

use contracts::EngineEvent;
use tokio::sync::broadcast;
use tracing::trace;

const CHANNEL_CAPACITY: usize = 64;

/// Broadcast hub for engine events
#[derive(Clone)]
pub struct EventNotifier {
    tx: broadcast::Sender<EngineEvent>,
}

impl Default for EventNotifier {
    fn default() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }
}

impl EventNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit an event to all subscribers; never blocks, never fails
    pub fn notify(&self, event: EngineEvent) {
        trace!(?event, receivers = self.tx.receiver_count(), "event");
        let _ = self.tx.send(event);
    }

    /// Subscribe to engine events
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }
}
