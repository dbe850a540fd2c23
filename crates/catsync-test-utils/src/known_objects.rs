//! Known-objects cache with operation recording.
//!
//! Wraps a real [`KnownObjectsCache`] and records every call so tests can
//! assert on what the planner invalidated, and in what order.

use std::sync::{Arc, Mutex};

use catsync_core::{KnownObjects, KnownObjectsCache};

/// Record of a known-objects operation for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnownObjectsOp {
    /// Remember operation.
    Remember {
        /// Qualified name that was remembered.
        qualified_name: String,
    },
    /// Invalidate operation.
    Invalidate {
        /// Qualified name that was invalidated.
        qualified_name: String,
    },
}

/// Known-objects cache with operation tracing.
#[derive(Debug, Clone)]
pub struct RecordingKnownObjects {
    cache: Arc<KnownObjectsCache>,
    operations: Arc<Mutex<Vec<KnownObjectsOp>>>,
}

impl Default for RecordingKnownObjects {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingKnownObjects {
    /// Creates an empty recording cache with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(KnownObjectsCache::default().capacity())
    }

    /// Creates an empty recording cache holding at most `capacity` names.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: Arc::new(KnownObjectsCache::new(capacity)),
            operations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Remembers `qualified_name` in the underlying cache.
    pub fn remember(&self, qualified_name: impl Into<String>) {
        let qualified_name = qualified_name.into();
        self.record(KnownObjectsOp::Remember {
            qualified_name: qualified_name.clone(),
        });
        self.cache.remember(qualified_name);
    }

    /// Returns whether the underlying cache holds `qualified_name`.
    #[must_use]
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.cache.contains(qualified_name)
    }

    /// Returns all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<KnownObjectsOp> {
        self.operations.lock().expect("lock").clone()
    }

    /// Returns the invalidated names, in call order.
    #[must_use]
    pub fn invalidated(&self) -> Vec<String> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                KnownObjectsOp::Invalidate { qualified_name } => Some(qualified_name),
                KnownObjectsOp::Remember { .. } => None,
            })
            .collect()
    }

    /// Clears recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().expect("lock").clear();
    }

    fn record(&self, op: KnownObjectsOp) {
        self.operations.lock().expect("lock").push(op);
    }
}

impl KnownObjects for RecordingKnownObjects {
    fn invalidate(&self, qualified_name: &str) {
        tracing::trace!(qualified_name, "Recorded invalidation");
        self.record(KnownObjectsOp::Invalidate {
            qualified_name: qualified_name.to_string(),
        });
        self.cache.invalidate(qualified_name);
    }
}
