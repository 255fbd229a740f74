//! Subscribable signals consumed by event-gated links.

use slotmap::SlotMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

slotmap::new_key_type! {
    struct SubscriberKey;
}

type Handler = Arc<dyn Fn() + Send + Sync>;
type Registry = Mutex<SlotMap<SubscriberKey, Handler>>;

fn lock(registry: &Registry) -> MutexGuard<'_, SlotMap<SubscriberKey, Handler>> {
    // Handlers are never invoked under the lock, so poisoning cannot leave
    // the map half-updated.
    registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// An external event source.
///
/// Cloning a `Signal` yields another handle to the same source. Handlers
/// may be raised from any thread.
///
/// # Example
///
/// ```rust
/// use linkstate::core::Signal;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let clicked = Signal::new();
/// let count = Arc::new(AtomicUsize::new(0));
///
/// let seen = Arc::clone(&count);
/// let subscription = clicked.subscribe(move || {
///     seen.fetch_add(1, Ordering::SeqCst);
/// });
///
/// clicked.raise();
/// subscription.unsubscribe();
/// clicked.raise();
///
/// assert_eq!(count.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone, Default)]
pub struct Signal {
    registry: Arc<Registry>,
}

impl Signal {
    /// Create a signal with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. It stays registered until the returned
    /// [`Subscription`] is unsubscribed or dropped.
    #[must_use = "dropping the subscription unsubscribes the handler"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let key = lock(&self.registry).insert(Arc::new(handler));
        Subscription {
            key,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Invoke every currently registered handler.
    pub fn raise(&self) {
        let handlers: Vec<Handler> = lock(&self.registry).values().cloned().collect();
        for handler in handlers {
            handler();
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry).len()
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Owned unsubscribe token returned by [`Signal::subscribe`].
pub struct Subscription {
    key: SubscriberKey,
    registry: Weak<Registry>,
}

impl Subscription {
    /// Remove the handler now instead of at drop.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).remove(self.key);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .finish()
    }
}
