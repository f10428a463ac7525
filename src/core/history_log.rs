//! In-memory append-only transaction history
//!
//! Every successful charge or use appends one immutable [`Transaction`]. Each
//! user's entries live in their own `Vec`, so the next sequence id is simply
//! the vector length plus one and is assigned while the `DashMap` entry is
//! held. Entries are never updated or removed.

use crate::core::traits::HistoryLog;
use crate::types::{Points, SequenceId, Transaction, TransactionKind, UserId};
use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Thread-safe history log backed by `DashMap`
#[derive(Debug, Default)]
pub struct InMemoryHistoryLog {
    /// Per-user entries in ascending sequence order
    entries: DashMap<UserId, Vec<Transaction>>,
}

impl InMemoryHistoryLog {
    /// Create a new empty history log
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl HistoryLog for InMemoryHistoryLog {
    fn append(
        &self,
        user_id: UserId,
        amount: Points,
        kind: TransactionKind,
        occurred_at: DateTime<Utc>,
    ) -> Transaction {
        let mut history = self.entries.entry(user_id).or_insert_with(Vec::new);
        let transaction = Transaction {
            sequence_id: history.len() as SequenceId + 1,
            user_id,
            amount,
            kind,
            occurred_at,
        };
        history.push(transaction.clone());
        transaction
    }

    fn list(&self, user_id: UserId) -> Vec<Transaction> {
        self.entries
            .get(&user_id)
            .map(|history| history.value().clone())
            .unwrap_or_default()
    }

    fn len(&self, user_id: UserId) -> usize {
        self.entries
            .get(&user_id)
            .map(|history| history.len())
            .unwrap_or(0)
    }
}
