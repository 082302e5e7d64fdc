use crate::Triple;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// A change notification fired by a base graph (spec.md §4.7).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    AddedTriple(Triple),
    DeletedTriple(Triple),
    AddedGraph(Vec<Triple>),
    DeletedGraph(Vec<Triple>),
}

/// A subscriber to graph change events.
pub trait Listener {
    fn on_event(&self, event: &Event);
}

impl<F: Fn(&Event)> Listener for F {
    fn on_event(&self, event: &Event) {
        self(event)
    }
}

/// Opaque token returned by `subscribe`/`register`, used to deregister
/// later. Deliberately not `Eq`-comparable to a listener itself, so
/// listeners never need to implement equality.
pub type ListenerHandle = u64;

/// The base graph's own event manager contract (external collaborator,
/// spec.md §1/§6): something that fans out [`Event`]s to registered raw
/// listeners, unfiltered.
pub trait BaseEventManager {
    fn subscribe(&self, listener: Arc<dyn Listener>) -> ListenerHandle;
    fn unsubscribe(&self, handle: ListenerHandle);
}

/// A minimal, in-process [`BaseEventManager`], used as the default event
/// manager of [`crate::HashGraph`] and in tests.
#[derive(Default)]
pub struct InMemoryEventManager {
    listeners: Mutex<HashMap<ListenerHandle, Arc<dyn Listener>>>,
    next_handle: AtomicU64,
}

impl InMemoryEventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `event` to every currently-subscribed raw listener.
    pub fn emit(&self, event: Event) {
        let listeners = self.listeners.lock().unwrap();
        for listener in listeners.values() {
            listener.on_event(&event);
        }
    }
}

impl BaseEventManager for InMemoryEventManager {
    fn subscribe(&self, listener: Arc<dyn Listener>) -> ListenerHandle {
        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().unwrap().insert(handle, listener);
        handle
    }

    fn unsubscribe(&self, handle: ListenerHandle) {
        self.listeners.lock().unwrap().remove(&handle);
    }
}

struct Registration {
    listener: Arc<dyn Listener>,
    can_read: Arc<dyn Fn(&Triple) -> bool>,
}

struct Inner {
    base: Arc<dyn BaseEventManager>,
    registrations: Mutex<HashMap<ListenerHandle, Registration>>,
    base_handle: Mutex<Option<ListenerHandle>>,
    next_handle: AtomicU64,
}

impl Inner {
    fn dispatch(&self, event: &Event) {
        let registrations = self.registrations.lock().unwrap();
        for registration in registrations.values() {
            if let Some(filtered) = filter_event(event, registration.can_read.as_ref()) {
                let listener = registration.listener.clone();
                // Listener exceptions never reach the base manager (spec.md §4.7).
                let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    listener.on_event(&filtered)
                }));
            }
        }
    }
}

struct Forwarder(Arc<Inner>);

impl Listener for Forwarder {
    fn on_event(&self, event: &Event) {
        self.0.dispatch(event);
    }
}

fn filter_event(event: &Event, can_read: &dyn Fn(&Triple) -> bool) -> Option<Event> {
    match event {
        Event::AddedTriple(t) => can_read(t).then(|| Event::AddedTriple(t.clone())),
        Event::DeletedTriple(t) => can_read(t).then(|| Event::DeletedTriple(t.clone())),
        Event::AddedGraph(ts) => {
            let filtered: Vec<Triple> = ts.iter().filter(|t| can_read(t)).cloned().collect();
            if filtered.is_empty() {
                None
            } else {
                Some(Event::AddedGraph(filtered))
            }
        }
        Event::DeletedGraph(ts) => {
            let filtered: Vec<Triple> = ts.iter().filter(|t| can_read(t)).cloned().collect();
            if filtered.is_empty() {
                None
            } else {
                Some(Event::DeletedGraph(filtered))
            }
        }
    }
}

/// The secured façade over a base graph's event manager (spec.md §4.7,
/// component C7): subscribes to the base manager once, on first listener
/// registration, and unsubscribes once, on the last deregistration; every
/// delivery is filtered per-listener by that listener's own Read
/// permission.
pub struct SecuredEventManager {
    inner: Arc<Inner>,
}

impl SecuredEventManager {
    pub fn new(base: Arc<dyn BaseEventManager>) -> Self {
        Self {
            inner: Arc::new(Inner {
                base,
                registrations: Mutex::new(HashMap::new()),
                base_handle: Mutex::new(None),
                next_handle: AtomicU64::new(0),
            }),
        }
    }

    /// Register `listener`, gated by `can_read` — typically
    /// `move |t| checker.can_read_triple(t)` for that listener's own
    /// principal (spec.md §9, principal as ambient context applies to
    /// listeners too: each listener's visibility is evaluated at delivery
    /// time, not registration time).
    pub fn register(
        &self,
        listener: Arc<dyn Listener>,
        can_read: Arc<dyn Fn(&Triple) -> bool>,
    ) -> ListenerHandle {
        let mut registrations = self.inner.registrations.lock().unwrap();
        let mut base_handle = self.inner.base_handle.lock().unwrap();
        if base_handle.is_none() {
            *base_handle = Some(self.inner.base.subscribe(Arc::new(Forwarder(self.inner.clone()))));
        }
        let handle = self.inner.next_handle.fetch_add(1, Ordering::SeqCst);
        registrations.insert(handle, Registration { listener, can_read });
        handle
    }

    pub fn deregister(&self, handle: ListenerHandle) {
        let mut registrations = self.inner.registrations.lock().unwrap();
        registrations.remove(&handle);
        if registrations.is_empty() {
            let mut base_handle = self.inner.base_handle.lock().unwrap();
            if let Some(handle) = base_handle.take() {
                self.inner.base.unsubscribe(handle);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.registrations.lock().unwrap().len()
    }
}
