//! Per-key async mutexes.
//!
//! Entries exist only while someone holds or waits on a key, so the map
//! stays proportional to the number of in-flight mutations.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug)]
struct Slot {
    mutex: Arc<AsyncMutex<()>>,
    /// Holders plus waiters, pending or not.
    users: usize,
}

type LockMap<K> = Arc<Mutex<HashMap<K, Slot>>>;

pub struct KeyedLocks<K> {
    locks: LockMap<K>,
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until `key` is free and hold it until the guard is dropped.
    pub async fn lock(&self, key: K) -> KeyGuard<K> {
        let (mutex, ticket) = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            let slot = locks.entry(key.clone()).or_insert_with(|| Slot {
                mutex: Arc::new(AsyncMutex::new(())),
                users: 0,
            });
            slot.users += 1;
            let ticket = Ticket {
                key,
                locks: self.locks.clone(),
            };
            (slot.mutex.clone(), ticket)
        };

        // The ticket releases the slot even if this future is dropped while
        // still waiting.
        let guard = mutex.lock_owned().await;
        KeyGuard {
            _guard: guard,
            _ticket: ticket,
        }
    }

    /// Number of keys currently held or awaited.
    #[cfg(test)]
    fn active_keys(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Exclusive hold on one key.
///
/// Fields drop in order: the mutex is released before the slot is.
#[derive(Debug)]
pub struct KeyGuard<K: Eq + Hash> {
    _guard: OwnedMutexGuard<()>,
    _ticket: Ticket<K>,
}

#[derive(Debug)]
struct Ticket<K: Eq + Hash> {
    key: K,
    locks: LockMap<K>,
}

impl<K: Eq + Hash> Drop for Ticket<K> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = locks.get_mut(&self.key) {
            slot.users -= 1;
            if slot.users == 0 {
                locks.remove(&self.key);
            }
        }
    }
}
