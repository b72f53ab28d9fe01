//! Event registry
//!
//! Maps each event kind to its subscribers and delivers events synchronously.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Event, EventKind};

/// Function called with every published event of a subscribed kind
pub type Callback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Identity of a subscriber, chosen by the subscriber
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(String);

impl SubscriberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SubscriberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SubscriberId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of subscribers per event kind
///
/// ## Concurrency:
/// - `subscribers`: RwLock (publishers share a read lock, (un)subscribe writes)
/// - `publish` clones the callbacks out and releases the lock before calling
///   them, so a callback may publish, subscribe or unsubscribe on the same
///   registry
#[derive(Default)]
pub struct EventRegistry {
    /// Subscribers per kind, ordered by id so delivery order is stable
    subscribers: RwLock<HashMap<EventKind, BTreeMap<SubscriberId, Callback>>>,
}

impl EventRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `id` to events of `kind`
    ///
    /// Returns `false` and keeps the earlier callback if `id` is already
    /// subscribed to `kind`.
    pub fn subscribe<F>(&self, kind: EventKind, id: impl Into<SubscriberId>, callback: F) -> bool
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = id.into();
        let mut subscribers = self.subscribers.write();
        let for_kind = subscribers.entry(kind).or_default();

        if for_kind.contains_key(&id) {
            tracing::debug!("{} already subscribed to {:?}", id, kind);
            return false;
        }

        tracing::debug!("{} subscribed to {:?}", id, kind);
        for_kind.insert(id, Arc::new(callback));
        true
    }

    /// Remove the subscription of `id` to `kind`
    pub fn unsubscribe(&self, kind: EventKind, id: &SubscriberId) -> bool {
        let mut subscribers = self.subscribers.write();
        subscribers
            .get_mut(&kind)
            .map(|for_kind| for_kind.remove(id).is_some())
            .unwrap_or(false)
    }

    /// Remove every subscription of `id`, returning how many were removed
    pub fn unsubscribe_all(&self, id: &SubscriberId) -> usize {
        let mut subscribers = self.subscribers.write();
        subscribers
            .values_mut()
            .filter_map(|for_kind| for_kind.remove(id))
            .count()
    }

    /// Deliver `event` to every subscriber of its kind
    ///
    /// Subscribers are those registered when `publish` starts; changes made
    /// by a callback apply from the next event on. Returns the number of
    /// callbacks invoked.
    pub fn publish(&self, event: &Event) -> usize {
        let callbacks: Vec<Callback> = match self.subscribers.read().get(&event.kind()) {
            Some(for_kind) => for_kind.values().cloned().collect(),
            None => return 0,
        };

        for callback in &callbacks {
            callback(event);
        }
        callbacks.len()
    }

    /// Number of subscribers for `kind`
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers
            .read()
            .get(&kind)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers = self.subscribers.read();
        let mut map = f.debug_map();
        for (kind, for_kind) in subscribers.iter() {
            map.entry(kind, &for_kind.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}
