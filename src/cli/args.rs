use crate::core::{AmountPolicy, AmountRange, LedgerConfig};
use crate::strategy::BatchConfig;
use crate::types::Points;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay point charge/use commands through the ledger
#[derive(Parser, Debug)]
#[command(name = "point-ledger")]
#[command(about = "Replay point charge/use commands and print final balances", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing `op,user,amount` rows
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy used for the replay
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of commands per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of commands per batch (default: 1000, max: 100000)"
    )]
    pub batch_size: Option<usize>,

    /// Runtime worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Smallest accepted charge amount
    #[arg(long = "min-charge", value_name = "POINTS")]
    pub min_charge: Option<Points>,

    /// Largest accepted charge amount
    #[arg(long = "max-charge", value_name = "POINTS")]
    pub max_charge: Option<Points>,

    /// Smallest accepted use amount
    #[arg(long = "min-use", value_name = "POINTS")]
    pub min_use: Option<Points>,

    /// Largest accepted use amount
    #[arg(long = "max-use", value_name = "POINTS")]
    pub max_use: Option<Points>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Absent values take the defaults. Out-of-range values are corrected
    /// by `BatchConfig::new`, which logs a warning for each.
    ///
    /// # Returns
    ///
    /// A `BatchConfig` with values from CLI arguments or defaults.
    pub fn to_batch_config(&self) -> BatchConfig {
        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent_batches
                .unwrap_or(default.max_concurrent_batches),
        )
    }

    /// Build the ledger's amount policy from the CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if a minimum exceeds its maximum, since such a range
    /// would reject every request.
    pub fn to_ledger_config(&self) -> Result<LedgerConfig, String> {
        let charge = amount_range("charge", self.min_charge, self.max_charge)?;
        let use_points = amount_range("use", self.min_use, self.max_use)?;

        Ok(LedgerConfig {
            policy: AmountPolicy { charge, use_points },
        })
    }
}

fn amount_range(
    name: &str,
    min: Option<Points>,
    max: Option<Points>,
) -> Result<AmountRange, String> {
    let default = AmountRange::default();
    let range = AmountRange::new(min.unwrap_or(default.min), max.unwrap_or(default.max));

    if range.min > range.max {
        return Err(format!(
            "--min-{name} ({}) exceeds --max-{name} ({})",
            range.min, range.max
        ));
    }

    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "input.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "input.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "input.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();

        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::all_defaults(&["program", "input.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "input.csv"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "input.csv"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "input.csv"], 1000, num_cpus::get())]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "input.csv"], 1000, num_cpus::get())]
    #[case::oversized_batch_size(
        &["program", "--batch-size", "1000000000", "input.csv"],
        crate::strategy::MAX_BATCH_SIZE,
        num_cpus::get()
    )]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_batches, expected_max_concurrent);
    }

    #[test]
    fn test_ledger_config_defaults_accept_any_positive_amount() {
        let config = CliArgs::try_parse_from(["program", "input.csv"])
            .unwrap()
            .to_ledger_config()
            .unwrap();

        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn test_ledger_config_from_policy_flags() {
        let args = [
            "program",
            "--min-charge",
            "1001",
            "--max-use",
            "4999",
            "input.csv",
        ];

        let config = CliArgs::try_parse_from(args)
            .unwrap()
            .to_ledger_config()
            .unwrap();

        assert_eq!(config.policy.charge, AmountRange::new(1001, Points::MAX));
        assert_eq!(config.policy.use_points, AmountRange::new(1, 4999));
    }

    #[rstest]
    #[case::charge(&["program", "--min-charge", "500", "--max-charge", "100", "input.csv"], "--min-charge")]
    #[case::use_points(&["program", "--min-use", "10", "--max-use", "9", "input.csv"], "--min-use")]
    fn test_ledger_config_rejects_inverted_range(#[case] args: &[&str], #[case] flag: &str) {
        let result = CliArgs::try_parse_from(args).unwrap().to_ledger_config();

        assert!(result.unwrap_err().starts_with(flag));
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "input.csv"])]
    #[case::non_numeric_policy(&["program", "--min-charge", "many", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
