//! Tracing setup and shared log helpers
//!
//! Logs go to stderr so stdout stays reserved for the CSV summary.

use crate::core::CommandOutcome;
use crate::types::{CommandRecord, CommandType, LedgerError};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber
///
/// The filter comes from `RUST_LOG`; directives that fail to parse are
/// skipped and `default_level` applies when none is given. Calling this
/// twice is a no-op.
pub fn init_tracing(default_level: tracing::Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(default_level).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log what a replayed command produced
///
/// Reads are logged at `debug` since the summary CSV never shows them.
/// Successful charges and uses are already logged by the ledger itself.
/// Failures go through [`log_rejection`].
pub fn log_outcome(record: &CommandRecord, result: &Result<CommandOutcome, LedgerError>) {
    match result {
        Ok(CommandOutcome::Balance(balance)) if record.op == CommandType::Balance => {
            tracing::debug!(user_id = balance.user_id, balance = balance.amount, "balance read");
        }
        Ok(CommandOutcome::History(entries)) => {
            tracing::debug!(user_id = record.user_id, entries = entries.len(), "history read");
        }
        Ok(CommandOutcome::Balance(_)) => {}
        Err(error) => log_rejection(record, error),
    }
}

/// Log a command the ledger rejected, at a level matching its kind
pub fn log_rejection(record: &CommandRecord, error: &LedgerError) {
    if error.is_internal() {
        tracing::error!(user_id = record.user_id, op = ?record.op, %error, "command failed");
    } else {
        tracing::warn!(user_id = record.user_id, op = ?record.op, %error, "command rejected");
    }
}

/// Run `f` with a debug-level subscriber on this thread and return its output
#[cfg(test)]
pub(crate) fn capture_logs(f: impl FnOnce()) -> String {
    use std::io;
    use std::sync::{Arc, Mutex};

    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = Arc::clone(&buffer);
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || SharedBuffer(Arc::clone(&writer)))
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}
