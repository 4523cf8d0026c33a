//! Live change-event relay.
//!
//! Owns the single subscriber slot and the platform lifecycle registration.
//! The registration is taken once and reused across re-subscribes; a new
//! subscriber displaces the old sink without touching the registration.

use crate::error::RegistryError;
use crate::registry::{
    AppRegistry, LifecycleCallback, ListenerHandle, RawLifecycleEvent, actions,
};
use crate::types::{ChangeEvent, ChangeKind};
use crossbeam_channel::{Receiver, Sender};
use log::debug;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

struct SubscriberSlot {
    sink: Option<Sender<ChangeEvent>>,
    // Present iff a platform registration is held.
    handle: Option<ListenerHandle>,
    // Bumped on every subscribe so a displaced stream can detect it is stale.
    generation: u64,
}

/// Relays normalized lifecycle events to at most one subscriber.
pub struct ChangeRelay {
    registry: Arc<dyn AppRegistry>,
    slot: Mutex<SubscriberSlot>,
}

impl ChangeRelay {
    pub fn new(registry: Arc<dyn AppRegistry>) -> Arc<Self> {
        Arc::new(Self {
            registry,
            slot: Mutex::new(SubscriberSlot {
                sink: None,
                handle: None,
                generation: 0,
            }),
        })
    }

    /// Open a stream of change events, displacing any previous subscriber.
    ///
    /// The platform listener is registered at most once; re-subscribing only
    /// swaps the sink. A displaced stream drains whatever it already
    /// received, then disconnects.
    pub fn subscribe(self: &Arc<Self>) -> Result<ChangeStream, RegistryError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut slot = self.slot.lock().unwrap();

        if slot.handle.is_none() {
            let relay = Arc::downgrade(self);
            let callback: LifecycleCallback = Box::new(move |raw| {
                if let Some(relay) = relay.upgrade() {
                    relay.on_raw_event(raw);
                }
            });
            slot.handle = Some(self.registry.register_lifecycle_listener(callback)?);
        }

        slot.sink = Some(tx);
        slot.generation += 1;
        debug!("change subscriber attached (generation {})", slot.generation);

        Ok(ChangeStream {
            events: rx,
            relay: Arc::downgrade(self),
            generation: slot.generation,
        })
    }

    /// Normalize one raw platform broadcast and forward it.
    ///
    /// Without an active sink the event is dropped; nothing is buffered.
    /// Events are forwarded in delivery order.
    pub fn on_raw_event(&self, raw: RawLifecycleEvent) {
        let event = normalize(raw);
        let slot = self.slot.lock().unwrap();
        match &slot.sink {
            Some(sink) => {
                if sink.send(event).is_err() {
                    debug!("subscriber receiver gone, dropping event");
                }
            }
            None => debug!("no subscriber, dropping {:?} event", event.kind),
        }
    }

    /// Stop delivering events and release the platform registration.
    ///
    /// Safe to call when already idle. Unregistration errors are swallowed:
    /// clearing the slot already satisfies the caller's contract of "no more
    /// events".
    pub fn cancel(&self) {
        let mut slot = self.slot.lock().unwrap();
        self.teardown(&mut slot);
    }

    fn cancel_generation(&self, generation: u64) {
        let mut slot = self.slot.lock().unwrap();
        if slot.generation == generation {
            self.teardown(&mut slot);
        }
    }

    fn teardown(&self, slot: &mut SubscriberSlot) {
        slot.sink = None;
        if let Some(handle) = slot.handle.take() {
            if let Err(err) = self.registry.unregister_lifecycle_listener(handle) {
                debug!("lifecycle unregistration failed (ignored): {err}");
            }
        }
    }
}

/// Live stream of [`ChangeEvent`]s for the active subscriber.
///
/// Dropping the stream cancels the subscription, unless a newer subscriber
/// has already displaced it.
pub struct ChangeStream {
    events: Receiver<ChangeEvent>,
    relay: Weak<ChangeRelay>,
    generation: u64,
}

impl ChangeStream {
    /// Block until the next event. `None` once the stream was displaced or
    /// cancelled and its backlog is drained.
    pub fn recv(&self) -> Option<ChangeEvent> {
        self.events.recv().ok()
    }

    /// Like [`recv`](ChangeStream::recv), giving up after `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ChangeEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// Non-blocking receive.
    pub fn try_recv(&self) -> Option<ChangeEvent> {
        self.events.try_recv().ok()
    }

    /// End delivery. Drop performs the actual teardown.
    pub fn cancel(self) {}
}

impl Drop for ChangeStream {
    fn drop(&mut self) {
        if let Some(relay) = self.relay.upgrade() {
            relay.cancel_generation(self.generation);
        }
    }
}

/// Fixed mapping from raw platform broadcasts to normalized events.
fn normalize(raw: RawLifecycleEvent) -> ChangeEvent {
    let kind = match raw.action.as_str() {
        actions::PACKAGE_ADDED => ChangeKind::Installed,
        actions::PACKAGE_REMOVED => ChangeKind::Removed,
        actions::PACKAGE_CHANGED => ChangeKind::Changed,
        _ => ChangeKind::Unknown,
    };
    let package = raw
        .data
        .as_deref()
        .and_then(scheme_specific_part)
        .map(str::to_string);
    ChangeEvent { kind, package }
}

/// `"pkg:org.example.app"` -> `"org.example.app"`. Data without a scheme is
/// taken verbatim; an empty identifier counts as absent.
fn scheme_specific_part(data: &str) -> Option<&str> {
    let id = data.split_once(':').map_or(data, |(_, rest)| rest);
    (!id.is_empty()).then_some(id)
}
