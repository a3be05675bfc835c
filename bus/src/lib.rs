#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Synchronous publish/subscribe hub connecting the presentation layer and
//! the simulation managers.
//!
//! Listeners are registered per [`EventKind`] and invoked in registration
//! order. Every emission iterates over a snapshot of the listener list, so a
//! listener that subscribes or unsubscribes while an event is being delivered
//! only affects later emissions. A listener that fails or panics is logged
//! and skipped; the remaining listeners still run and the emitter never
//! observes the failure.

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use arcade_core::{Event, EventKind};
use thiserror::Error;

/// Callback invoked for every event of the kind it was registered for.
///
/// The bus passes itself to the callback so listeners can publish follow-up
/// events without holding a reference to the bus.
pub type Listener = Rc<dyn Fn(&EventBus, &Event) -> Result<(), ListenerError>>;

/// Wraps a closure into a [`Listener`].
///
/// Keep the returned value: [`EventBus::off`] removes a listener by identity,
/// so the same `Rc` passed to [`EventBus::on`] must be used to unsubscribe.
pub fn listener<F>(callback: F) -> Listener
where
    F: Fn(&EventBus, &Event) -> Result<(), ListenerError> + 'static,
{
    Rc::new(callback)
}

/// Failures reported by listeners. The bus logs them and keeps delivering.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The listener's owner was already borrowed by an outer handler.
    #[error("{0} is already handling an event")]
    Busy(&'static str),
    /// The listener could not process the event.
    #[error("listener failed: {0}")]
    Failed(String),
}

/// Publish/subscribe hub keyed by [`EventKind`].
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<HashMap<EventKind, Vec<Listener>>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        let mut counts: Vec<_> = listeners
            .iter()
            .map(|(kind, registered)| (*kind, registered.len()))
            .collect();
        counts.sort();
        f.debug_struct("EventBus")
            .field("listeners", &counts)
            .finish()
    }
}

impl EventBus {
    /// Creates a bus without listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for events of `kind`.
    ///
    /// Registering the same listener twice for one kind has no effect.
    pub fn on(&self, kind: EventKind, listener: &Listener) {
        let mut listeners = self.listeners.borrow_mut();
        let registered = listeners.entry(kind).or_default();
        if registered.iter().any(|existing| same_listener(existing, listener)) {
            return;
        }
        registered.push(Rc::clone(listener));
    }

    /// Unregisters `listener` from events of `kind`.
    ///
    /// Returns `false` when the listener was not registered for that kind.
    pub fn off(&self, kind: EventKind, listener: &Listener) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(registered) = listeners.get_mut(&kind) else {
            return false;
        };
        let before = registered.len();
        registered.retain(|existing| !same_listener(existing, listener));
        let removed = registered.len() != before;
        if registered.is_empty() {
            let _ = listeners.remove(&kind);
        }
        removed
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .get(&kind)
            .map_or(0, |registered| registered.len())
    }

    /// Removes every listener.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Delivers `event` to every listener registered for its kind.
    pub fn emit(&self, event: &Event) {
        let kind = event.kind();
        let snapshot: Vec<Listener> = match self.listeners.borrow().get(&kind) {
            Some(registered) => registered.clone(),
            None => return,
        };

        for listener in snapshot {
            match panic::catch_unwind(AssertUnwindSafe(|| listener(self, event))) {
                Ok(Ok(())) => {}
                Ok(Err(error)) => log::warn!("listener for {kind} failed: {error}"),
                Err(payload) => {
                    log::error!("listener for {kind} panicked: {}", panic_message(&payload));
                }
            }
        }
    }

    /// Delivers each event in order.
    pub fn emit_all<I>(&self, events: I)
    where
        I: IntoIterator<Item = Event>,
    {
        for event in events {
            self.emit(&event);
        }
    }
}

fn same_listener(a: &Listener, b: &Listener) -> bool {
    // Data pointers only; vtable pointers are not stable across codegen units.
    std::ptr::eq(Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
