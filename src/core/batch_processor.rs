//! Batch processing with user-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which replays a batch of
//! commands against a shared [`PointLedger`] with one tokio task per user.
//!
//! # Design
//!
//! The ledger's per-user lock already makes concurrent commands for one user
//! safe. Partitioning adds ordering on top: a user's commands run in file
//! order inside a single task, so the outcome of a replay does not depend on
//! task scheduling, while different users still run in parallel.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── Arc<PointLedger>  (shared, internally synchronized)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use super::ledger::{CommandOutcome, PointLedger};
use crate::logging::log_outcome;
use crate::types::{CommandRecord, LedgerError, UserId};

/// Result of replaying a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was replayed
    pub record: CommandRecord,

    /// What the ledger returned for it
    pub result: Result<CommandOutcome, LedgerError>,
}

/// Batch processor with user-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Shared ledger all tasks replay into
    ledger: Arc<PointLedger>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor over a shared ledger
    pub fn new(ledger: Arc<PointLedger>) -> Self {
        Self { ledger }
    }

    /// Partition a batch of commands by user id
    ///
    /// # Guarantees
    ///
    /// - Each command appears in exactly one sub-batch
    /// - Commands for each user keep their original order
    pub fn partition_by_user(
        &self,
        batch: Vec<CommandRecord>,
    ) -> HashMap<UserId, Vec<CommandRecord>> {
        let mut user_batches: HashMap<UserId, Vec<CommandRecord>> = HashMap::new();

        for record in batch {
            user_batches.entry(record.user_id).or_default().push(record);
        }

        user_batches
    }

    /// Replay one user's commands sequentially, in order
    ///
    /// Every outcome is logged the same way the sync strategy logs it.
    /// Failed commands are recorded and don't stop the rest.
    pub async fn process_user_commands(
        &self,
        commands: Vec<CommandRecord>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(commands.len());

        for record in commands {
            let result = self.ledger.process(record.clone());
            log_outcome(&record, &result);
            results.push(ProcessingResult { record, result });
        }

        results
    }

    /// Replay a batch with one task per user
    ///
    /// Waits for every task before returning. Results are grouped per user;
    /// the order between users is unspecified.
    pub async fn process_batch(&self, batch: Vec<CommandRecord>) -> Vec<ProcessingResult> {
        let user_batches = self.partition_by_user(batch);

        let mut tasks = Vec::with_capacity(user_batches.len());
        for (_user_id, commands) in user_batches {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_user_commands(commands).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(user_results) => results.extend(user_results),
                Err(e) => tracing::error!(error = %e, "replay task failed"),
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommandType;

    fn charge(user_id: UserId, amount: i64) -> CommandRecord {
        CommandRecord {
            op: CommandType::Charge,
            user_id,
            amount: Some(amount),
        }
    }

    fn use_points(user_id: UserId, amount: i64) -> CommandRecord {
        CommandRecord {
            op: CommandType::Use,
            user_id,
            amount: Some(amount),
        }
    }

    #[test]
    fn test_partition_by_user_empty_batch() {
        let processor = BatchProcessor::new(Arc::new(PointLedger::new()));

        let partitioned = processor.partition_by_user(vec![]);

        assert!(partitioned.is_empty());
    }

    #[test]
    fn test_partition_by_user_keeps_per_user_order() {
        let processor = BatchProcessor::new(Arc::new(PointLedger::new()));
        let batch = vec![
            charge(1, 100),
            charge(2, 200),
            use_points(1, 30),
            charge(3, 300),
            use_points(2, 80),
            charge(1, 5),
        ];

        let partitioned = processor.partition_by_user(batch);

        assert_eq!(partitioned.len(), 3);
        assert_eq!(
            partitioned[&1],
            vec![charge(1, 100), use_points(1, 30), charge(1, 5)]
        );
        assert_eq!(partitioned[&2], vec![charge(2, 200), use_points(2, 80)]);
        assert_eq!(partitioned[&3], vec![charge(3, 300)]);
    }

    #[test]
    fn test_processor_is_cloneable_and_shares_ledger() {
        let ledger = Arc::new(PointLedger::new());
        let processor = BatchProcessor::new(Arc::clone(&ledger));
        let _clone = processor.clone();

        assert_eq!(Arc::strong_count(&ledger), 3);
    }

    #[tokio::test]
    async fn test_process_user_commands_in_order() {
        let ledger = Arc::new(PointLedger::new());
        let processor = BatchProcessor::new(Arc::clone(&ledger));

        // The use only succeeds because the charge before it ran first.
        let results = processor
            .process_user_commands(vec![charge(1, 100), use_points(1, 60), use_points(1, 60)])
            .await;

        assert_eq!(results.len(), 3);
        assert!(results[0].result.is_ok());
        assert!(results[1].result.is_ok());
        assert_eq!(
            results[2].result,
            Err(LedgerError::insufficient_balance(1, 40, 60))
        );
        assert_eq!(ledger.get_balance(1).unwrap().amount, 40);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_multiple_users() {
        let ledger = Arc::new(PointLedger::new());
        let processor = BatchProcessor::new(Arc::clone(&ledger));
        let batch = vec![
            charge(1, 100),
            charge(2, 50),
            use_points(1, 30),
            charge(2, 25),
            use_points(1, 20),
            use_points(3, 10),
        ];

        let results = processor.process_batch(batch).await;

        assert_eq!(results.len(), 6);
        assert_eq!(results.iter().filter(|r| r.result.is_err()).count(), 1);
        assert_eq!(ledger.get_balance(1).unwrap().amount, 50);
        assert_eq!(ledger.get_balance(2).unwrap().amount, 75);
        assert!(ledger.get_balance(3).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_process_batch_many_users() {
        let ledger = Arc::new(PointLedger::new());
        let processor = BatchProcessor::new(Arc::clone(&ledger));
        let batch: Vec<CommandRecord> = (1..=50u64)
            .flat_map(|user_id| [charge(user_id, 1000), use_points(user_id, 100)])
            .collect();

        let results = processor.process_batch(batch).await;

        assert!(results.iter().all(|r| r.result.is_ok()));
        for user_id in 1..=50u64 {
            assert_eq!(ledger.get_balance(user_id).unwrap().amount, 900);
            assert_eq!(ledger.get_history(user_id).unwrap().len(), 2);
        }
    }

    #[test]
    fn test_process_batch_logs_reads_at_debug() {
        let processor = BatchProcessor::new(Arc::new(PointLedger::new()));
        let batch = vec![
            charge(1, 100),
            CommandRecord {
                op: CommandType::Balance,
                user_id: 1,
                amount: None,
            },
            CommandRecord {
                op: CommandType::History,
                user_id: 1,
                amount: None,
            },
        ];

        // Spawned tasks stay on this thread, so they log to the captured subscriber
        let logs = crate::logging::capture_logs(|| {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            runtime.block_on(processor.process_batch(batch));
        });

        assert!(logs.contains("balance read"));
        assert!(logs.contains("balance=100"));
        assert!(logs.contains("history read"));
    }
}
