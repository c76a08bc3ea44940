//! Change notification streams
//!
//! An [`EventEmitter`] keeps a list of listeners. Subscribing hands back a
//! [`Subscription`]; the listener stays registered until the subscription is
//! disposed or dropped.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<T> {
    next_id: u64,
    entries: BTreeMap<u64, Listener<T>>,
}

/// Multi-listener event stream
pub struct EventEmitter<T> {
    listeners: Arc<Mutex<Listeners<T>>>,
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<T> EventEmitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: BTreeMap::new(),
            })),
        }
    }

    /// Register a listener. It is called for every fired event until the
    /// returned subscription is disposed or dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: 'static,
    {
        let id = match self.listeners.lock() {
            Ok(mut listeners) => {
                let id = listeners.next_id;
                listeners.next_id += 1;
                listeners.entries.insert(id, Arc::new(listener));
                id
            }
            Err(e) => {
                log::error!("EventEmitter: listener lock poisoned: {}", e);
                return Subscription::detached();
            }
        };

        let weak: Weak<Mutex<Listeners<T>>> = Arc::downgrade(&self.listeners);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(listeners) = weak.upgrade() {
                    if let Ok(mut listeners) = listeners.lock() {
                        listeners.entries.remove(&id);
                    }
                }
            })),
        }
    }

    /// Call every registered listener, in subscription order
    pub fn fire(&self, event: &T) {
        // Listeners run without the lock held so they may (un)subscribe
        let listeners: Vec<Listener<T>> = match self.listeners.lock() {
            Ok(listeners) => listeners.entries.values().cloned().collect(),
            Err(e) => {
                log::error!("EventEmitter: listener lock poisoned: {}", e);
                return;
            }
        };

        for listener in listeners {
            listener(event);
        }
    }

    /// Number of currently registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .map(|listeners| listeners.entries.len())
            .unwrap_or(0)
    }
}

/// Handle to a registered listener
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn detached() -> Self {
        Self { unsubscribe: None }
    }

    /// Unregister the listener now
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
