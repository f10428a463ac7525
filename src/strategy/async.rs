//! Asynchronous batch processing strategy
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (per-user partitioning, one task per user)
//!         └── Arc<PointLedger>
//! ```
//!
//! Batches run one after another so a user's commands keep file order even
//! when they span batches. Inside a batch, users run in parallel on the
//! tokio multi-thread runtime.

use crate::core::{BatchProcessor, LedgerConfig, PointLedger};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_summary_csv;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Largest accepted batch size
///
/// Each batch is buffered in memory before it is replayed.
pub const MAX_BATCH_SIZE: usize = 100_000;

/// Configuration for batch processing
///
/// Controls how many commands are read per batch and how many worker
/// threads the runtime uses to replay users in parallel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Worker threads for the runtime
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults and a batch size above
    /// [`MAX_BATCH_SIZE`] is lowered to it, each with a warning.
    ///
    /// # Arguments
    ///
    /// * `batch_size` - Number of commands per batch
    /// * `max_concurrent_batches` - Number of runtime worker threads
    ///
    /// # Returns
    ///
    /// A `BatchConfig` whose values are all usable
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else if batch_size > MAX_BATCH_SIZE {
            tracing::warn!(
                batch_size,
                max = MAX_BATCH_SIZE,
                "batch size too large, using maximum"
            );
            MAX_BATCH_SIZE
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid concurrency, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Reads commands in batches and replays each batch with one tokio task per
/// user. Batches run one after another, so a user's commands keep their
/// file order even when they span batches.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    ledger_config: LedgerConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `config` - Batch size and worker thread count
    /// * `ledger_config` - Amount policy for the ledger the replay builds
    ///
    /// # Returns
    ///
    /// A new `AsyncProcessingStrategy` configured for batch processing
    pub fn new(config: BatchConfig, ledger_config: LedgerConfig) -> Self {
        Self {
            config,
            ledger_config,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Replay commands from `input_path` and write the summary to `output`
    ///
    /// This method:
    /// 1. Builds a multi-thread tokio runtime with the configured workers
    /// 2. Reads batches of commands with `AsyncReader`
    /// 3. Replays each batch through `BatchProcessor`, one task per user
    /// 4. Writes the final per-user summary with `write_summary_csv`
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the command CSV
    /// * `output` - Writer receiving the summary CSV
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the replay finished, even with rejected commands
    /// * `Err(String)` if the runtime, the input file or the output failed
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let ledger = Arc::new(PointLedger::with_config(self.ledger_config));
        let processor = BatchProcessor::new(Arc::clone(&ledger));

        runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut replayed = 0usize;
            let mut rejected = 0usize;
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                // Wait for the whole batch so a user's later commands never
                // overtake earlier ones.
                let results = processor.process_batch(batch).await;
                replayed += results.len();
                rejected += results.iter().filter(|r| r.result.is_err()).count();
            }

            tracing::info!(replayed, rejected, "replay finished");
            Ok::<(), String>(())
        })?;

        write_summary_csv(&ledger.summaries(), output)
    }
}
