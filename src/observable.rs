//! Observable values with explicit subscribe/unsubscribe
//!
//! A [`Subject`] holds the latest value and a list of callbacks. Setting a
//! value and notifying subscribers are separate steps so that an owner can
//! update several related subjects before anyone observes them.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle returned by [`Subject::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub struct Subject<T> {
    value: RwLock<T>,
    subscribers: Mutex<Vec<(SubscriptionId, Callback<T>)>>,
    next_id: AtomicU64,
}

impl<T: Clone> Subject<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: RwLock::new(initial),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Register a callback for every subsequent value
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Arc::new(callback)));
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.lock();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Replace the value without notifying anyone
    pub(crate) fn replace(&self, value: T) {
        *self.value.write() = value;
    }

    /// Deliver the current value to every subscriber.
    ///
    /// No lock is held while callbacks run, so a callback may read this
    /// subject or (un)subscribe.
    pub(crate) fn notify(&self) {
        let value = self.get();
        let callbacks: Vec<Callback<T>> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for cb in callbacks {
            cb(&value);
        }
    }

    /// Replace and notify
    pub fn publish(&self, value: T) {
        self.replace(value);
        self.notify();
    }
}

impl<T: Clone + Default> Default for Subject<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("value", &*self.value.read())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
