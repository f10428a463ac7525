//! Core business logic module
//!
//! This module contains the point ledger components:
//! - `traits` - Storage abstractions for balances and history
//! - `balance_store` - DashMap-backed current balances
//! - `history_log` - DashMap-backed append-only history
//! - `lock_manager` - Per-user mutual exclusion
//! - `policy` - Amount policy configuration
//! - `ledger` - Request validation and orchestration
//! - `batch_processor` - Per-user partitioned replay on tokio tasks

pub mod balance_store;
pub mod batch_processor;
pub mod history_log;
pub mod ledger;
pub mod lock_manager;
pub mod policy;
pub mod traits;

pub use balance_store::InMemoryBalanceStore;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use history_log::InMemoryHistoryLog;
pub use ledger::{CommandOutcome, PointLedger};
pub use lock_manager::KeyedLockManager;
pub use policy::{AmountPolicy, AmountRange, LedgerConfig};
pub use traits::{BalanceStore, HistoryLog};
