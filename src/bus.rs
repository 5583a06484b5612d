//! Change propagation from the knowledge store to external consumers.
//!
//! The renderer (and anything else outside the engine) subscribes with a
//! callback and gets a disposer-returning [`Subscription`] back, independent
//! of any UI framework's lifecycle. Internal consumers (paths, insights,
//! layout) are wired explicitly by the engine instead of going through the
//! bus — ownership stays obvious and there is exactly one writer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};

use crate::node::{KnowledgeNode, Understanding};

/// A change to the canonical node collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KnowledgeEvent {
    /// A new node entered the store.
    NodeCreated { node: KnowledgeNode },
    /// An existing node was clicked again (time credited, no new node).
    NodeRevisited { node: KnowledgeNode },
    /// Engagement time moved a node across an understanding threshold.
    UnderstandingChanged {
        id: String,
        from: Understanding,
        to: Understanding,
    },
    /// A node left the store (connections and path references cascade).
    NodeDeleted { id: String },
}

type Listener = Arc<dyn Fn(&KnowledgeEvent) + Send + Sync>;

struct Registry {
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

/// Subscribe/notify hub for [`KnowledgeEvent`]s.
///
/// Notification order is the subscription order. The listener list sits
/// behind a mutex so that, should a host runtime ever call in from more than
/// one thread, notification stays serialized — the engine itself is
/// single-writer by construction.
#[derive(Clone)]
pub struct ChangeBus {
    inner: Arc<Mutex<Registry>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry {
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a listener. Dropping the returned [`Subscription`] (or calling
    /// `unsubscribe`) removes it.
    pub fn subscribe(
        &self,
        listener: impl Fn(&KnowledgeEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let mut registry = lock(&self.inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(listener)));
        Subscription {
            bus: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver an event to every live listener, in subscription order.
    ///
    /// Callbacks run on a snapshot taken outside the lock, so a listener may
    /// subscribe or dispose subscriptions (its own included) from inside its
    /// callback. Removals take effect for the next notification.
    pub fn notify(&self, event: &KnowledgeEvent) {
        let snapshot: Vec<Listener> = {
            let registry = lock(&self.inner);
            registry
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };
        for listener in &snapshot {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Disposer handle for one bus listener.
///
/// Unsubscribes on drop; `unsubscribe` exists for call sites that want the
/// removal to read explicitly.
pub struct Subscription {
    bus: Weak<Mutex<Registry>>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            lock(&inner).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// A listener that panicked poisons the registry lock; the registry itself is
/// a plain id→callback list and stays consistent, so the poison flag is
/// cleared rather than propagated.
fn lock(inner: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}
