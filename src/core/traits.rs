//! Core traits for balance storage and history logging
//!
//! This module defines the storage abstractions the ledger service
//! orchestrates. Both are shared by every caller thread, so all methods take
//! `&self` and implementations synchronize internally per entry.

use crate::types::{Balance, Points, Transaction, TransactionKind, UserId};
use chrono::{DateTime, Utc};

/// Trait for storing current balances
///
/// Each call is atomic with respect to other calls on the same user, but a
/// read-modify-write spanning `get` and `set` is only safe while the caller
/// holds that user's lock from the [`KeyedLockManager`](super::KeyedLockManager).
pub trait BalanceStore: Send + Sync {
    /// Get the balance for a user, `None` if the user was never charged
    fn get(&self, user_id: UserId) -> Option<Balance>;

    /// Insert or overwrite the balance for a user
    fn set(&self, user_id: UserId, amount: Points, updated_at: DateTime<Utc>) -> Balance;

    /// Get all balances
    fn snapshot(&self) -> Vec<Balance>;
}

/// Trait for the append-only transaction history
pub trait HistoryLog: Send + Sync {
    /// Append an entry, assigning the user's next sequence id
    fn append(
        &self,
        user_id: UserId,
        amount: Points,
        kind: TransactionKind,
        occurred_at: DateTime<Utc>,
    ) -> Transaction;

    /// Get a user's entries in ascending sequence order (empty if none)
    fn list(&self, user_id: UserId) -> Vec<Transaction>;

    /// Number of entries recorded for a user
    fn len(&self, user_id: UserId) -> usize;
}
