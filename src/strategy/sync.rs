//! Synchronous processing strategy
//!
//! Streams commands with [`SyncReader`] and runs them one at a time on the
//! calling thread. Memory use is bounded by the ledger state, not the input
//! size.

use crate::core::{LedgerConfig, PointLedger};
use crate::io::csv_format::write_summary_csv;
use crate::io::sync_reader::SyncReader;
use crate::logging::log_outcome;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// ```no_run
/// use point_ledger::core::LedgerConfig;
/// use point_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let strategy = SyncProcessingStrategy::new(LedgerConfig::default());
/// strategy
///     .process(Path::new("commands.csv"), &mut std::io::stdout())
///     .expect("replay failed");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncProcessingStrategy {
    ledger_config: LedgerConfig,
}

impl SyncProcessingStrategy {
    /// Create a new SyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `ledger_config` - Amount policy for the ledger built on each replay
    ///
    /// # Returns
    ///
    /// A new SyncProcessingStrategy instance
    pub fn new(ledger_config: LedgerConfig) -> Self {
        Self { ledger_config }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Replay commands from a CSV file synchronously
    ///
    /// 1. Opens the input with [`SyncReader`]
    /// 2. Runs each command through a fresh [`PointLedger`], in file order
    /// 3. Writes the per-user summary once the input is exhausted
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input CSV file
    /// * `output` - Writer the summary CSV goes to
    ///
    /// # Returns
    ///
    /// `Ok(())` once the summary is written. Malformed rows and rejected
    /// commands are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be opened or the summary cannot
    /// be written.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let ledger = PointLedger::with_config(self.ledger_config);
        let reader = SyncReader::new(input_path)?;

        let mut replayed = 0usize;
        let mut rejected = 0usize;
        for result in reader {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping row");
                    continue;
                }
            };

            replayed += 1;
            let result = ledger.process(record.clone());
            if result.is_err() {
                rejected += 1;
            }
            log_outcome(&record, &result);
        }

        tracing::info!(replayed, rejected, "replay finished");
        write_summary_csv(&ledger.summaries(), output)
    }
}
