//! Known-objects cache.
//!
//! Hooks remember which qualified names the target store already holds so they
//! can skip re-sending unchanged entities. A rename makes the old name stale;
//! the planner calls [`KnownObjects::invalidate`] once planning succeeds.
//!
//! Invalidation is fire-and-forget: implementations must accept repeated
//! invalidation of an absent key without complaint.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

/// Capability to drop a qualified name from a known-objects cache.
pub trait KnownObjects: Send + Sync {
    /// Forgets `qualified_name`. Absent keys are ignored.
    fn invalidate(&self, qualified_name: &str);
}

/// Cache that never remembers anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopKnownObjects;

impl KnownObjects for NoopKnownObjects {
    fn invalidate(&self, _qualified_name: &str) {}
}

/// Bounded in-memory known-objects cache.
///
/// When full, remembering a new name evicts the oldest remembered one.
#[derive(Debug)]
pub struct KnownObjectsCache {
    capacity: usize,
    inner: Mutex<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    // name -> insertion sequence; `order` may hold stale sequences for
    // invalidated or re-remembered names, skipped during eviction.
    entries: HashMap<String, u64>,
    order: VecDeque<(u64, String)>,
    next_seq: u64,
}

impl KnownObjectsCache {
    /// Creates a cache holding at most `capacity` names (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheState::default()),
        }
    }

    /// Returns the configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records `qualified_name` as known to the target store.
    pub fn remember(&self, qualified_name: impl Into<String>) {
        let qualified_name = qualified_name.into();
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(qualified_name.clone(), seq);
        state.order.push_back((seq, qualified_name));

        while state.entries.len() > self.capacity {
            let Some((seq, name)) = state.order.pop_front() else {
                break;
            };
            if state.entries.get(&name) == Some(&seq) {
                state.entries.remove(&name);
                tracing::trace!(qualified_name = %name, "Evicted known object");
            }
        }

        // Bound the stale backlog left behind by invalidations.
        if state.order.len() > self.capacity.saturating_mul(2) {
            let CacheState { entries, order, .. } = &mut *state;
            order.retain(|(seq, name)| entries.get(name) == Some(seq));
        }
    }

    /// Returns true if `qualified_name` is remembered.
    #[must_use]
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .contains_key(qualified_name)
    }

    /// Returns the number of remembered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Returns true if nothing is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for KnownObjectsCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl KnownObjects for KnownObjectsCache {
    fn invalidate(&self, qualified_name: &str) {
        let removed = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .remove(qualified_name)
            .is_some();
        tracing::debug!(qualified_name, removed, "Invalidated known object");
    }
}
