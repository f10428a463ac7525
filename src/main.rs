//! Point Ledger CLI
//!
//! Replays a CSV of point commands and prints each user's final balance.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > balances.csv
//! cargo run -- --strategy sync commands.csv > balances.csv
//! cargo run -- --batch-size 2000 --max-concurrent 8 commands.csv > balances.csv
//! cargo run -- --min-charge 1001 --max-use 4999 commands.csv > balances.csv
//! RUST_LOG=point_ledger=debug cargo run -- commands.csv
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, invalid policy flags, output failure)

use point_ledger::{cli, logging, strategy};
use std::process;

fn main() {
    logging::init_tracing(tracing::Level::INFO);

    let args = cli::parse_args();

    let ledger_config = match args.to_ledger_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            process::exit(1);
        }
    };

    let batch_config = match args.strategy {
        cli::StrategyType::Async => Some(args.to_batch_config()),
        cli::StrategyType::Sync => None,
    };
    let strategy = strategy::create_strategy(args.strategy, batch_config, ledger_config);

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        tracing::error!(error = %e, "replay failed");
        process::exit(1);
    }
}
