//! Per-user mutual exclusion
//!
//! This module provides the `KeyedLockManager`, which serializes charge/use
//! sequences for one user without making unrelated users wait.
//!
//! # Design
//!
//! Locks live in a `DashMap<UserId, Arc<Mutex<()>>>`. A caller clones the
//! user's `Arc` out of the map (creating it on first use), releases the map
//! shard, and only then blocks on the mutex. Two users hashing to the same
//! shard therefore never wait on each other's critical sections.
//!
//! When the last holder or waiter lets go, the entry is removed again. The
//! check runs under the shard lock, and every new holder clones its `Arc`
//! under that same lock, so an entry is only removed when nobody can still
//! be using it.

use crate::types::{LedgerError, UserId};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};

type KeyLock = Arc<Mutex<()>>;

/// Lock manager granting exclusion per user id
#[derive(Debug, Default)]
pub struct KeyedLockManager {
    locks: DashMap<UserId, KeyLock>,
}

impl KeyedLockManager {
    /// Create a new manager with no lock state
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Run `f` while holding the lock for `user_id`
    ///
    /// Blocks while another caller holds the same user's lock. The lock is
    /// released on every exit path of `f`, including panics, before this
    /// method returns.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::LockPoisoned` to the first caller that acquires
    /// the lock after a holder panicked while others were waiting. The poison
    /// is cleared at that point, so every later caller runs normally.
    /// Otherwise returns whatever `f` returns.
    pub fn with_lock<T, F>(&self, user_id: UserId, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce() -> Result<T, LedgerError>,
    {
        // Locals drop in reverse order on every exit path, unwinding included:
        // the guard first, then our reference, then the prune.
        let _prune = PruneOnDrop {
            manager: self,
            user_id,
        };
        let lock = self.acquire(user_id);
        let _guard = match lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // Only the first caller after the panic sees the poison; the
                // mutex guards no data, so later callers get a clean lock.
                lock.clear_poison();
                drop(poisoned);
                tracing::error!(user_id, "per-user lock poisoned by a panicking holder");
                return Err(LedgerError::lock_poisoned(user_id));
            }
        };
        f()
    }

    /// Number of users that currently have lock state (held or awaited)
    pub fn active_keys(&self) -> usize {
        self.locks.len()
    }

    fn acquire(&self, user_id: UserId) -> KeyLock {
        Arc::clone(
            self.locks
                .entry(user_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        )
    }

    fn prune(&self, user_id: UserId) {
        self.locks
            .remove_if(&user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Removes a user's lock entry on drop if no caller references it anymore
struct PruneOnDrop<'a> {
    manager: &'a KeyedLockManager,
    user_id: UserId,
}

impl Drop for PruneOnDrop<'_> {
    fn drop(&mut self) {
        self.manager.prune(self.user_id);
    }
}
