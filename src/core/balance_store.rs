//! In-memory balance storage
//!
//! This module provides the `InMemoryBalanceStore` struct, which keeps the
//! current balance of every user in a `DashMap`.
//!
//! # Thread Safety
//!
//! `DashMap` shards its entries behind internal read/write locks, so a `get`
//! always observes either the previous or the new record of a concurrent
//! `set`, never a torn one. Serializing whole charge/use sequences is the job
//! of the per-user lock, not of this store.

use crate::core::traits::BalanceStore;
use crate::types::{Balance, Points, UserId};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Thread-safe balance store backed by `DashMap`
#[derive(Debug, Default)]
pub struct InMemoryBalanceStore {
    /// Current balance records keyed by user id
    balances: DashMap<UserId, Balance>,
}

impl InMemoryBalanceStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
        }
    }
}

impl BalanceStore for InMemoryBalanceStore {
    fn get(&self, user_id: UserId) -> Option<Balance> {
        self.balances.get(&user_id).map(|entry| entry.value().clone())
    }

    fn set(&self, user_id: UserId, amount: Points, updated_at: DateTime<Utc>) -> Balance {
        let balance = Balance::new(user_id, amount, updated_at);
        self.balances.insert(user_id, balance.clone());
        balance
    }

    fn snapshot(&self) -> Vec<Balance> {
        self.balances
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
