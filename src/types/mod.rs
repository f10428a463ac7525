//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `balance`: Balance record
//! - `transaction`: Identifiers, history entries and replay commands
//! - `error`: Error types for the point ledger

pub mod balance;
pub mod error;
pub mod transaction;

pub use balance::{Balance, BalanceSummary};
pub use error::{ErrorKind, LedgerError};
pub use transaction::{
    CommandRecord, CommandType, Points, SequenceId, Transaction, TransactionKind, UserId,
};
