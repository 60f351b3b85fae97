//! Event system for the phone
//!
//! Views subscribe to [`PhoneEvent`]s to know when to re-render. Events are
//! fanned out over a tokio broadcast channel; a slow subscriber lags instead
//! of blocking the controller.

use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::state_table::EventType;
use crate::types::{CallId, CallPhase, Contact, HistoryEntry, MissedCallEntry};

/// Events emitted by the call controller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhoneEvent {
    /// The live call moved between phases
    CallStateChanged {
        call_id: CallId,
        previous: CallPhase,
        current: CallPhase,
        contact: Contact,
    },

    /// A terminal history record was written
    HistoryAppended(HistoryEntry),

    /// A declined incoming call was logged
    MissedCallAppended(MissedCallEntry),

    /// One more tick of an active call
    DurationTick { call_id: CallId, elapsed_secs: u64 },

    /// A command had no transition from the current phase
    CommandIgnored { phase: CallPhase, event: EventType },

    /// The simulated incoming call fired while another call was live
    IncomingCallDropped { contact: Contact },

    /// The controller stopped; no further events follow
    ShutDown,
}

/// Event stream type
pub type EventStream = BroadcastStream<PhoneEvent>;

/// Simple event iterator that doesn't require StreamExt
pub struct EventIterator {
    stream: EventStream,
}

impl EventIterator {
    pub fn new(stream: EventStream) -> Self {
        Self { stream }
    }

    /// Next event, skipping over lag notifications; `None` once closed
    pub async fn next(&mut self) -> Option<PhoneEvent> {
        use tokio_stream::StreamExt;
        loop {
            match self.stream.next().await {
                Some(Ok(event)) => return Some(event),
                Some(Err(lagged)) => {
                    tracing::warn!("Event subscriber lagging: {}", lagged);
                }
                None => return None,
            }
        }
    }
}

/// Event emitter for the phone
#[derive(Clone)]
pub struct EventEmitter {
    sender: broadcast::Sender<PhoneEvent>,
}

impl EventEmitter {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn emit(&self, event: PhoneEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> EventStream {
        BroadcastStream::new(self.sender.subscribe())
    }

    pub fn subscribe_simple(&self) -> EventIterator {
        EventIterator::new(self.subscribe())
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(256)
    }
}
