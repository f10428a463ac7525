//! Transaction-related types for the point ledger
//!
//! This module defines identifiers, the history record appended for every
//! successful charge or use, and the command records replayed from CSV input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User identifier
///
/// Adapters only hand the core positive ids; zero is rejected while parsing.
pub type UserId = u64;

/// Point amount
///
/// Signed so that non-positive request amounts can reach validation and be
/// rejected with a typed error instead of failing to parse.
pub type Points = i64;

/// Per-user sequence number of a history entry, starting at 1
pub type SequenceId = u64;

/// Kind of a committed balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Credit points to a user, creating the balance on first charge
    Charge,

    /// Debit points from a user, bounded by the current balance
    Use,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Charge => f.write_str("charge"),
            TransactionKind::Use => f.write_str("use"),
        }
    }
}

/// Immutable history entry for one successful charge or use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Position in the user's history, reflecting commit order
    pub sequence_id: SequenceId,

    /// The user whose balance changed
    pub user_id: UserId,

    /// Points moved (always positive)
    pub amount: Points,

    /// Whether the points were charged or used
    pub kind: TransactionKind,

    /// Instant the change was committed, equal to the balance's `updated_at`
    pub occurred_at: DateTime<Utc>,
}

/// Operations accepted by the replay input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    /// Credit points
    Charge,

    /// Debit points
    Use,

    /// Read the current balance
    Balance,

    /// Read the ordered history
    History,
}

impl CommandType {
    /// The balance change this command commits, if it mutates anything
    pub fn transaction_kind(&self) -> Option<TransactionKind> {
        match self {
            CommandType::Charge => Some(TransactionKind::Charge),
            CommandType::Use => Some(TransactionKind::Use),
            CommandType::Balance | CommandType::History => None,
        }
    }
}

/// One command read from the replay input
///
/// The amount is optional because balance and history reads carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    /// The operation to run
    pub op: CommandType,

    /// The user the operation targets (positive)
    pub user_id: UserId,

    /// Points for charge/use, `None` for reads
    pub amount: Option<Points>,
}
