use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::trace;

use super::event::RawEvent;

pub type Listener = Arc<dyn Fn(&RawEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Removes one subscription when called. Consumed on use.
pub struct Unsubscribe(Box<dyn FnOnce() + Send>);

impl Unsubscribe {
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn call(self) {
        (self.0)()
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Unsubscribe")
    }
}

/// Anything that can deliver instrumentation events to a callback.
pub trait InstrumentationSource {
    fn subscribe(&self, listener: Listener) -> Unsubscribe;
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

/// Synchronous in-process event source.
///
/// `emit` runs every listener serially on the caller's thread before
/// returning. Listeners added or removed while an emit is running take
/// effect from the next emit.
#[derive(Clone, Default)]
pub struct SpyHub {
    inner: Arc<Mutex<HubInner>>,
}

impl SpyHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        lock_inner(&self.inner)
    }

    pub fn add_listener(&self, listener: Listener) -> ListenerId {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner.listeners.push((id, listener));
        trace!(?id, "listener registered");
        id
    }

    /// Returns `false` when the id was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        remove_from(&self.inner, id)
    }

    pub fn emit(&self, event: &RawEvent) {
        // Snapshot so listeners may (un)subscribe without deadlocking.
        let listeners: Vec<Listener> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    pub fn is_spying(&self) -> bool {
        self.listener_count() > 0
    }
}

impl InstrumentationSource for SpyHub {
    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        let id = self.add_listener(listener);
        let weak: Weak<Mutex<HubInner>> = Arc::downgrade(&self.inner);
        Unsubscribe::new(move || {
            if let Some(inner) = weak.upgrade() {
                remove_from(&inner, id);
            }
        })
    }
}

impl fmt::Debug for SpyHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpyHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

fn lock_inner(inner: &Mutex<HubInner>) -> MutexGuard<'_, HubInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn remove_from(inner: &Mutex<HubInner>, id: ListenerId) -> bool {
    let mut inner = lock_inner(inner);
    let before = inner.listeners.len();
    inner.listeners.retain(|(lid, _)| *lid != id);
    let removed = inner.listeners.len() != before;
    if removed {
        trace!(?id, "listener removed");
    }
    removed
}
