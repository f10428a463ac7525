//! End-to-end integration tests
//!
//! Each fixture under `tests/fixtures/<name>/` holds an `input.csv` of
//! commands and the `expected.csv` summary. Every fixture is replayed with
//! both the sync and the async strategy and must produce identical output.

#[cfg(test)]
mod tests {
    use point_ledger::cli::StrategyType;
    use point_ledger::core::LedgerConfig;
    use point_ledger::strategy::{create_strategy, BatchConfig};
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Replay `tests/fixtures/{fixture_name}/input.csv` and compare with expected.csv
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType, batch: Option<BatchConfig>) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );

        let strategy = create_strategy(strategy_type, batch, LedgerConfig::default());
        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        strategy
            .process(Path::new(&input_path), &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to replay commands: {}", e));
        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
    }

    #[rstest]
    #[case("happy_path")]
    #[case("insufficient_balance")]
    #[case("invalid_amounts")]
    #[case("unknown_user")]
    #[case("multiple_users")]
    #[case("malformed_data")]
    #[case("whitespace_and_case")]
    #[case("arithmetic_overflow")]
    #[case("empty_input")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, strategy, None);
    }

    /// Tiny batches force a user's commands across batch boundaries
    #[rstest]
    #[case("happy_path")]
    #[case("insufficient_balance")]
    #[case("multiple_users")]
    fn test_fixtures_with_small_batches(#[case] fixture: &str, #[values(1, 2, 3)] batch_size: usize) {
        run_test_fixture(
            fixture,
            StrategyType::Async,
            Some(BatchConfig::new(batch_size, 2)),
        );
    }
}
