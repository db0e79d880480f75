//! Callback Cache
//!
//! Maps a correlation id to a pending native callback. Result-bearing calls
//! register one-shot entries; event listeners register repeating entries that
//! stay until explicitly removed.
//!
//! Ids are random v4 UUIDs rather than a counter, so a reloaded page can never
//! post a message that collides with an id issued before the reload.
//!
//! A lookup miss is never an error: the embedded content may still post for a
//! listener that the native side has already removed.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

// ─────────────────────────────────────────────────────────────────────────────
// Callback id
// ─────────────────────────────────────────────────────────────────────────────

/// Correlation id pairing an outbound call or subscription with inbound messages
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(String);

impl CallbackId {
    /// Generate a fresh, collision-free id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CallbackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CallbackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for CallbackId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entries
// ─────────────────────────────────────────────────────────────────────────────

/// How often an entry expects to be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Method result: removed on first resolution
    Once,
    /// Event listener: stays until removed
    Repeating,
}

/// A native callback receiving the decoded payload
pub type Callback = Box<dyn FnMut(Value) + Send + 'static>;

struct Entry {
    cardinality: Cardinality,
    callback: Arc<Mutex<Callback>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache
// ─────────────────────────────────────────────────────────────────────────────

/// Process-local table of pending callbacks
///
/// Cloning is cheap and yields a view of the same table. Callbacks are invoked
/// after the table entry has been released, so a callback may register or
/// remove other entries without deadlocking.
#[derive(Clone, Default)]
pub struct CallbackCache {
    entries: Arc<DashMap<CallbackId, Entry>>,
}

impl CallbackCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a callback under a freshly generated id
    pub fn register(&self, cardinality: Cardinality, callback: Callback) -> CallbackId {
        let id = CallbackId::generate();
        self.entries.insert(
            id.clone(),
            Entry {
                cardinality,
                callback: Arc::new(Mutex::new(callback)),
            },
        );
        debug!("Registered {:?} callback {}", cardinality, id);
        id
    }

    /// Register a callback that is consumed by its first resolution
    pub fn register_once<F>(&self, callback: F) -> CallbackId
    where
        F: FnOnce(Value) + Send + 'static,
    {
        let mut slot = Some(callback);
        self.register(
            Cardinality::Once,
            Box::new(move |payload| {
                if let Some(callback) = slot.take() {
                    callback(payload);
                }
            }),
        )
    }

    /// Register a callback that may fire any number of times
    pub fn register_repeating<F>(&self, callback: F) -> CallbackId
    where
        F: FnMut(Value) + Send + 'static,
    {
        self.register(Cardinality::Repeating, Box::new(callback))
    }

    /// Invoke a one-shot callback and evict it. Returns false on a miss.
    ///
    /// A repeating entry under `id` is left alone and counts as a miss.
    pub fn resolve_once(&self, id: &str, payload: Value) -> bool {
        let Some((_, entry)) = self
            .entries
            .remove_if(id, |_, entry| entry.cardinality == Cardinality::Once)
        else {
            if self.contains(id) {
                warn!("Ignoring result for repeating callback {}", id);
            } else {
                warn!("No callback found with id: {}", id);
            }
            return false;
        };
        let mut callback = entry.callback.lock();
        (*callback)(payload);
        true
    }

    /// Invoke a repeating callback and keep it. Returns false on a miss.
    ///
    /// A one-shot entry under `id` is left pending and counts as a miss.
    pub fn resolve_repeating(&self, id: &str, payload: Value) -> bool {
        let callback = match self.entries.get(id) {
            Some(entry) if entry.cardinality == Cardinality::Repeating => entry.callback.clone(),
            Some(_) => {
                warn!("Ignoring event for one-shot callback {}", id);
                return false;
            }
            None => {
                warn!("No callback found with id: {}", id);
                return false;
            }
        };
        let mut callback = callback.lock();
        (*callback)(payload);
        true
    }

    /// Explicitly evict an entry. Returns whether it was present.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.entries.remove(id).is_some();
        if !removed {
            debug!("Callback {} already removed", id);
        }
        removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn cardinality(&self, id: &str) -> Option<Cardinality> {
        self.entries.get(id).map(|entry| entry.cardinality)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every pending entry. Pending result futures observe a closed channel.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl fmt::Debug for CallbackCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackCache")
            .field("len", &self.entries.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(4))]

        #[test]
        fn prop_ids_are_unique(count in 10_000usize..12_000, once in any::<bool>()) {
            let cache = CallbackCache::new();
            let ids: HashSet<CallbackId> = (0..count)
                .map(|_| {
                    if once {
                        cache.register_once(|_| {})
                    } else {
                        cache.register_repeating(|_| {})
                    }
                })
                .collect();
            prop_assert_eq!(ids.len(), count);
            prop_assert_eq!(cache.len(), count);
        }
    }

    #[test]
    fn test_resolve_once_evicts() {
        let cache = CallbackCache::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let id = cache.register_once(move |payload| {
            assert_eq!(payload, json!(42));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(cache.cardinality(id.as_str()), Some(Cardinality::Once));
        assert!(cache.resolve_once(id.as_str(), json!(42)));
        assert!(!cache.contains(id.as_str()));

        // Second resolution is a logged miss, not a second invocation
        assert!(!cache.resolve_once(id.as_str(), json!(42)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resolve_repeating_keeps_entry() {
        let cache = CallbackCache::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let id = cache.register_repeating(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        for _ in 0..3 {
            assert!(cache.resolve_repeating(id.as_str(), Value::Null));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(cache.contains(id.as_str()));

        assert!(cache.remove(id.as_str()));
        assert!(!cache.resolve_repeating(id.as_str(), Value::Null));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_under_one_shot_id_keeps_call_pending() {
        let cache = CallbackCache::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();
        let id = cache.register_once(move |payload| sink.lock().push(payload));

        assert!(!cache.resolve_repeating(id.as_str(), json!({"eventName": "click"})));
        assert!(cache.contains(id.as_str()));
        assert!(received.lock().is_empty());

        // The genuine result still reaches the caller
        assert!(cache.resolve_once(id.as_str(), json!(7)));
        assert_eq!(*received.lock(), vec![json!(7)]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_result_under_listener_id_keeps_listener() {
        let cache = CallbackCache::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let id = cache.register_repeating(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!cache.resolve_once(id.as_str(), json!(1)));
        assert_eq!(cache.cardinality(id.as_str()), Some(Cardinality::Repeating));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        assert!(cache.resolve_repeating(id.as_str(), Value::Null));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let cache = CallbackCache::new();
        let id = cache.register_repeating(|_| {});
        assert!(cache.remove(id.as_str()));
        assert!(!cache.remove(id.as_str()));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_id_is_not_fatal() {
        let cache = CallbackCache::new();
        assert!(!cache.resolve_once("missing", json!(null)));
        assert!(!cache.resolve_repeating("missing", json!(null)));
    }

    #[test]
    fn test_callback_may_touch_cache() {
        let cache = CallbackCache::new();
        let inner = cache.clone();
        let slot: Arc<Mutex<Option<CallbackId>>> = Arc::new(Mutex::new(None));
        let own_id = slot.clone();

        // A listener that unsubscribes itself on first delivery
        let id = cache.register_repeating(move |_| {
            if let Some(id) = own_id.lock().as_ref() {
                inner.remove(id.as_str());
            }
        });
        *slot.lock() = Some(id.clone());

        assert!(cache.resolve_repeating(id.as_str(), Value::Null));
        assert!(!cache.contains(id.as_str()));
    }

    #[test]
    fn test_clear_drops_pending() {
        let cache = CallbackCache::new();
        cache.register_once(|_| {});
        cache.register_repeating(|_| {});
        cache.clear();
        assert!(cache.is_empty());
    }
}
