//! tracker.rs: in-memory set of identity keys already enriched during this run.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::identity::IdentityKey;

/// Grows monotonically for the lifetime of the instance; never pruned.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    inner: Mutex<HashSet<IdentityKey>>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_processed(&self, key: &IdentityKey) -> bool {
        self.inner
            .lock()
            .expect("processed set mutex poisoned")
            .contains(key)
    }

    pub fn mark_processed(&self, key: IdentityKey) {
        self.inner
            .lock()
            .expect("processed set mutex poisoned")
            .insert(key);
    }

    /// Check-and-mark under one lock. Returns `true` if `key` was unseen
    /// (and is now marked).
    pub fn try_mark(&self, key: &IdentityKey) -> bool {
        let mut set = self.inner.lock().expect("processed set mutex poisoned");
        if set.contains(key) {
            return false;
        }
        set.insert(key.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("processed set mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
