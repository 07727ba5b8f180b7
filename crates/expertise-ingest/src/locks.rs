//! Per-key mutual exclusion for read-modify-write of author and entity records.

use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;

use expertise_core::errors::{ExpertiseResult, StorageError};

/// One mutex per key, created on first use and kept for the life of the map.
#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex for `key`. Hold the returned handle while locked.
    pub fn handle(&self, key: &str) -> Arc<Mutex<()>> {
        if let Some(existing) = self.locks.get(key) {
            return Arc::clone(existing.value());
        }
        Arc::clone(self.locks.entry(key.to_string()).or_default().value())
    }

    /// Handles for `keys`, deduplicated and in sorted order. Locking them in
    /// the returned order cannot deadlock against another caller doing the same.
    pub fn sorted_handles<'a, I>(&self, keys: I) -> Vec<Arc<Mutex<()>>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut keys: Vec<&str> = keys.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();
        keys.into_iter().map(|key| self.handle(key)).collect()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Lock a single handle, mapping poisoning to a storage error.
pub fn acquire(handle: &Mutex<()>) -> ExpertiseResult<MutexGuard<'_, ()>> {
    handle.lock().map_err(|e| {
        StorageError::LockPoisoned {
            details: e.to_string(),
        }
        .into()
    })
}

/// Lock every handle, one at a time, in slice order.
pub fn acquire_all(handles: &[Arc<Mutex<()>>]) -> ExpertiseResult<Vec<MutexGuard<'_, ()>>> {
    handles.iter().map(|handle| acquire(handle)).collect()
}
