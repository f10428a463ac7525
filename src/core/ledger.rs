//! Point ledger service
//!
//! This module provides the `PointLedger` that validates requests and
//! orchestrates the per-user lock, the balance store and the history log.
//!
//! # Request Flow
//!
//! ```text
//! charge/use_points
//!     ├── validate amount (rejected requests never take a lock)
//!     └── KeyedLockManager::with_lock(user_id)
//!           ├── BalanceStore::get
//!           ├── business-rule checks
//!           ├── BalanceStore::set
//!           └── HistoryLog::append
//! ```
//!
//! Every check that can fail runs before the first write, so a rejected
//! request leaves both stores untouched. Balance and history reads take no
//! lock; each store read is an atomic snapshot of one user's entry.

use crate::core::balance_store::InMemoryBalanceStore;
use crate::core::history_log::InMemoryHistoryLog;
use crate::core::lock_manager::KeyedLockManager;
use crate::core::policy::LedgerConfig;
use crate::core::traits::{BalanceStore, HistoryLog};
use crate::types::{
    Balance, BalanceSummary, CommandRecord, CommandType, LedgerError, Points, Transaction,
    TransactionKind, UserId,
};
use chrono::{DateTime, Utc};

/// Result of a replayed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Balance after a charge/use, or the balance that was read
    Balance(Balance),
    /// History that was read
    History(Vec<Transaction>),
}

/// Per-user point ledger
///
/// Shareable across threads behind an `Arc`; all operations take `&self`.
#[derive(Debug)]
pub struct PointLedger<B = InMemoryBalanceStore, H = InMemoryHistoryLog> {
    balances: B,
    history: H,
    locks: KeyedLockManager,
    config: LedgerConfig,
}

impl PointLedger {
    /// Create an empty in-memory ledger with the default policy
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    /// Create an empty in-memory ledger with a custom configuration
    pub fn with_config(config: LedgerConfig) -> Self {
        Self::with_stores(InMemoryBalanceStore::new(), InMemoryHistoryLog::new(), config)
    }
}

impl Default for PointLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BalanceStore, H: HistoryLog> PointLedger<B, H> {
    /// Create a ledger over the given stores
    pub fn with_stores(balances: B, history: H, config: LedgerConfig) -> Self {
        Self {
            balances,
            history,
            locks: KeyedLockManager::new(),
            config,
        }
    }

    /// Configuration this ledger validates against
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Number of users whose lock is currently held or awaited
    pub fn active_locks(&self) -> usize {
        self.locks.active_keys()
    }

    /// Get a user's current balance
    ///
    /// # Errors
    ///
    /// * `LedgerError::UserNotFound` if the user was never charged
    pub fn get_balance(&self, user_id: UserId) -> Result<Balance, LedgerError> {
        self.balances
            .get(user_id)
            .ok_or_else(|| LedgerError::user_not_found(user_id))
    }

    /// Get a user's history in commit order
    ///
    /// # Errors
    ///
    /// * `LedgerError::UserNotFound` if the user has no history
    pub fn get_history(&self, user_id: UserId) -> Result<Vec<Transaction>, LedgerError> {
        let history = self.history.list(user_id);
        if history.is_empty() {
            return Err(LedgerError::user_not_found(user_id));
        }
        Ok(history)
    }

    /// Credit `amount` points to a user
    ///
    /// The first charge for a user creates their balance record.
    ///
    /// # Returns
    ///
    /// The balance after the charge.
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvalidAmount` if `amount <= 0`
    /// * `LedgerError::AmountOutOfRange` if `amount` is outside the charge policy
    /// * `LedgerError::ArithmeticOverflow` if the balance would overflow
    /// * `LedgerError::LockPoisoned` on an internal fault
    pub fn charge(&self, user_id: UserId, amount: Points) -> Result<Balance, LedgerError> {
        self.config
            .policy
            .check(user_id, TransactionKind::Charge, amount)?;

        self.locks.with_lock(user_id, || {
            let current = self.balances.get(user_id);
            let new_amount = current
                .as_ref()
                .map_or(0, |balance| balance.amount)
                .checked_add(amount)
                .ok_or_else(|| {
                    LedgerError::arithmetic_overflow(user_id, TransactionKind::Charge)
                })?;

            let balance = self.commit(
                user_id,
                current.as_ref(),
                new_amount,
                amount,
                TransactionKind::Charge,
            );
            tracing::debug!(user_id, amount, balance = balance.amount, "points charged");
            Ok(balance)
        })
    }

    /// Debit `amount` points from a user
    ///
    /// # Returns
    ///
    /// The balance after the use.
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvalidAmount` if `amount <= 0`
    /// * `LedgerError::AmountOutOfRange` if `amount` is outside the use policy
    /// * `LedgerError::UserNotFound` if the user was never charged
    /// * `LedgerError::InsufficientBalance` if `amount` exceeds the balance
    /// * `LedgerError::LockPoisoned` on an internal fault
    pub fn use_points(&self, user_id: UserId, amount: Points) -> Result<Balance, LedgerError> {
        self.config
            .policy
            .check(user_id, TransactionKind::Use, amount)?;

        self.locks.with_lock(user_id, || {
            let current = self
                .balances
                .get(user_id)
                .ok_or_else(|| LedgerError::user_not_found(user_id))?;

            if current.has_insufficient(amount) {
                tracing::debug!(user_id, amount, balance = current.amount, "use rejected");
                return Err(LedgerError::insufficient_balance(
                    user_id,
                    current.amount,
                    amount,
                ));
            }

            let balance = self.commit(
                user_id,
                Some(&current),
                current.amount - amount,
                amount,
                TransactionKind::Use,
            );
            tracing::debug!(user_id, amount, balance = balance.amount, "points used");
            Ok(balance)
        })
    }

    /// Run one replayed command
    ///
    /// # Errors
    ///
    /// * `LedgerError::MissingAmount` for a charge/use without an amount
    /// * any error of the operation the command maps to
    pub fn process(&self, record: CommandRecord) -> Result<CommandOutcome, LedgerError> {
        match record.op {
            CommandType::Charge => {
                let amount = record.amount.ok_or_else(|| {
                    LedgerError::missing_amount(record.user_id, TransactionKind::Charge)
                })?;
                self.charge(record.user_id, amount).map(CommandOutcome::Balance)
            }
            CommandType::Use => {
                let amount = record.amount.ok_or_else(|| {
                    LedgerError::missing_amount(record.user_id, TransactionKind::Use)
                })?;
                self.use_points(record.user_id, amount)
                    .map(CommandOutcome::Balance)
            }
            CommandType::Balance => self
                .get_balance(record.user_id)
                .map(CommandOutcome::Balance),
            CommandType::History => self
                .get_history(record.user_id)
                .map(CommandOutcome::History),
        }
    }

    /// Final balance and history length of every user, sorted by user id
    pub fn summaries(&self) -> Vec<BalanceSummary> {
        let mut summaries: Vec<BalanceSummary> = self
            .balances
            .snapshot()
            .into_iter()
            .map(|balance| BalanceSummary {
                user_id: balance.user_id,
                balance: balance.amount,
                transactions: self.history.len(balance.user_id),
            })
            .collect();
        summaries.sort_by_key(|summary| summary.user_id);
        summaries
    }

    /// Write the new balance and append the history entry
    ///
    /// Caller must hold the user's lock and have completed every check.
    fn commit(
        &self,
        user_id: UserId,
        previous: Option<&Balance>,
        new_amount: Points,
        amount: Points,
        kind: TransactionKind,
    ) -> Balance {
        let now = commit_time(previous);
        let balance = self.balances.set(user_id, new_amount, now);
        self.history.append(user_id, amount, kind, now);
        balance
    }
}

/// Current time, never earlier than the previous update
fn commit_time(previous: Option<&Balance>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(balance) if balance.updated_at > now => balance.updated_at,
        _ => now,
    }
}
