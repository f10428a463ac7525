//! Processing strategy module for command replay
//!
//! A strategy owns the whole replay pipeline: reading the command CSV,
//! running each command through a [`PointLedger`](crate::core::PointLedger),
//! and writing the per-user summary. The sync and async variants are
//! selected at runtime.

use crate::cli::StrategyType;
use crate::core::LedgerConfig;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig, MAX_BATCH_SIZE};
pub use sync::SyncProcessingStrategy;

/// Replay pipeline interface
pub trait ProcessingStrategy: Send + Sync {
    /// Replay the commands in `input_path` and write the summary to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - The async runtime cannot be built
    /// - Output cannot be written
    ///
    /// Rejected commands and malformed rows are logged and skipped; they
    /// never fail the replay.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `batch_config` only applies to the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    batch_config: Option<BatchConfig>,
    ledger_config: LedgerConfig,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(ledger_config)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            batch_config.unwrap_or_default(),
            ledger_config,
        )),
    }
}
