use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use cinelist_models::WatchlistEntry;

pub type SubscriptionId = u64;

pub(crate) type Observer = Arc<dyn Fn(&[WatchlistEntry]) + Send + Sync>;

/// Registered observers, delivered to in registration order
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: SubscriptionId,
    observers: BTreeMap<SubscriptionId, Observer>,
}

impl ObserverRegistry {
    pub(crate) fn register(&mut self, observer: Observer) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.observers.insert(id, observer);
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(&id).is_some()
    }

    pub(crate) fn observers(&self) -> Vec<Observer> {
        self.observers.values().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

/// Handle returned by `WatchlistStore::subscribe`.
///
/// Delivery stops on `unsubscribe` or when the handle is dropped.
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<Mutex<ObserverRegistry>>,
    active: bool,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, registry: &Arc<Mutex<ObserverRegistry>>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active && self.registry.strong_count() > 0
    }

    /// Idempotent; a store that is already gone is not an error
    pub fn unsubscribe(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
