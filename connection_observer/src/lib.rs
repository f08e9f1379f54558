//! # Connection Observer
//!
//! Forwards connection-state changes reported by the native library to
//! whoever is listening.
//!
//! ## Philosophy
//!
//! - **Structured, not callbacks all the way down**: Native callbacks become
//!   typed [`ConnectionEvent`]s on a channel
//! - **Never blocks the caller**: The native library invokes callbacks on its
//!   own threads; forwarding is a non-blocking push into an unbounded channel
//! - **Ordered**: Events of one handle kind keep their emission order and carry
//!   increasing sequence numbers
//! - **Inspectable**: The last state per handle kind can be queried
//!
//! ## Example
//!
//! ```
//! use connection_observer::ConnectionObserver;
//! use core_types::{ConnectionState, HandleKind};
//!
//! let (observer, events) = ConnectionObserver::new();
//! let callback = observer.callback(HandleKind::Anonymous);
//!
//! // The native library calls this from its own thread.
//! callback(0);
//!
//! let event = events.try_recv().unwrap();
//! assert_eq!(event.state, ConnectionState::Connected);
//! assert_eq!(observer.last_state(HandleKind::Anonymous), Some(ConnectionState::Connected));
//! ```

use async_channel::{Receiver, Sender};
use core_types::{ConnectionState, HandleKind};
use native_client::StateCallback;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, trace};

/// A connection-state change of one handle kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEvent {
    pub kind: HandleKind,
    pub state: ConnectionState,
    /// Starts at 1 for each kind
    pub sequence: u64,
}

#[derive(Debug, Default)]
struct Slot {
    last_sequence: u64,
    last_state: Option<ConnectionState>,
}

struct ObserverState {
    sender: Sender<ConnectionEvent>,
    anonymous: Mutex<Slot>,
    authenticated: Mutex<Slot>,
}

impl ObserverState {
    fn slot(&self, kind: HandleKind) -> MutexGuard<'_, Slot> {
        let slot = match kind {
            HandleKind::Anonymous => &self.anonymous,
            HandleKind::Authenticated => &self.authenticated,
        };
        slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The two observer slots and the channel they feed
///
/// Cloning shares the slots.
#[derive(Clone)]
pub struct ConnectionObserver {
    inner: Arc<ObserverState>,
}

impl ConnectionObserver {
    /// Creates an observer and the receiving end of its channel
    pub fn new() -> (Self, ConnectionEvents) {
        let (sender, receiver) = async_channel::unbounded();
        let observer = Self {
            inner: Arc::new(ObserverState {
                sender,
                anonymous: Mutex::new(Slot::default()),
                authenticated: Mutex::new(Slot::default()),
            }),
        };
        (observer, ConnectionEvents { receiver })
    }

    /// Callback to hand to the native library for sessions of `kind`
    pub fn callback(&self, kind: HandleKind) -> StateCallback {
        let observer = self.clone();
        Arc::new(move |code| {
            observer.publish(kind, ConnectionState::from_code(code));
        })
    }

    /// Records a state and pushes the resulting event
    ///
    /// The slot lock is held while the sequence number is assigned and the
    /// event is queued, so sequence order equals channel order per kind.
    pub fn publish(&self, kind: HandleKind, state: ConnectionState) -> ConnectionEvent {
        let mut slot = self.inner.slot(kind);
        slot.last_sequence += 1;
        slot.last_state = Some(state);

        let event = ConnectionEvent {
            kind,
            state,
            sequence: slot.last_sequence,
        };

        if self.inner.sender.try_send(event).is_err() {
            trace!(%kind, %state, "No connection event subscribers");
        }
        debug!(%kind, %state, sequence = event.sequence, "Connection state changed");
        event
    }

    /// Last state reported for `kind`
    pub fn last_state(&self, kind: HandleKind) -> Option<ConnectionState> {
        self.inner.slot(kind).last_state
    }
}

/// Receiving end of the connection event channel
///
/// Clones compete for events; each event is delivered once.
#[derive(Debug, Clone)]
pub struct ConnectionEvents {
    receiver: Receiver<ConnectionEvent>,
}

impl ConnectionEvents {
    /// Waits for the next event
    ///
    /// Returns `None` once every observer is dropped and the channel is empty.
    pub async fn recv(&self) -> Option<ConnectionEvent> {
        self.receiver.recv().await.ok()
    }

    /// Takes the next event if one is queued
    pub fn try_recv(&self) -> Option<ConnectionEvent> {
        self.receiver.try_recv().ok()
    }

    /// Takes every queued event
    pub fn drain(&self) -> Vec<ConnectionEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
