//! Point Ledger Library
//!
//! # Overview
//!
//! An in-memory point ledger: each user has a non-negative integer balance
//! and an append-only history of charges and uses. Every mutation of a user
//! is serialized by a per-user lock, so concurrent requests for the same user
//! never lose updates while different users proceed in parallel.
//!
//! # Architecture
//!
//! - [`types`] - Domain data types (Balance, Transaction, LedgerError, etc.)
//! - [`core`] - Ledger components:
//!   - [`core::balance_store`] - Current balance per user
//!   - [`core::history_log`] - Append-only history per user
//!   - [`core::lock_manager`] - Per-user mutual exclusion
//!   - [`core::policy`] - Configurable amount bounds
//!   - [`core::ledger`] - Validation and orchestration
//!   - [`core::batch_processor`] - Per-user partitioned replay on tokio tasks
//! - [`io`] - Command CSV readers and summary writer
//! - [`strategy`] - Sync and async replay pipelines
//! - [`cli`] - CLI arguments parsing
//! - [`logging`] - Tracing subscriber setup
//!
//! # Operations
//!
//! - **charge**: add points; the first charge creates the user
//! - **use**: spend points; fails if the balance would go negative
//! - **balance**: read the current balance
//! - **history**: read the user's transactions in commit order

pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{CommandOutcome, LedgerConfig, PointLedger};
pub use io::write_summary_csv;
pub use types::{
    Balance, BalanceSummary, CommandRecord, CommandType, ErrorKind, LedgerError, Points,
    Transaction, TransactionKind, UserId,
};
