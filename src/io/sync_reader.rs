//! Synchronous CSV reader with iterator interface
//!
//! Streams replay commands from a CSV file one row at a time. Format concerns
//! live in the csv_format module; this reader only owns the file handle and
//! the header row.
//!
//! ```no_run
//! use point_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("commands.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Replaying: {:?}", record),
//!         Err(e) => eprintln!("Skipped: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, unreadable header) are returned from `new()`
//! - Row errors are yielded as `Err` items carrying the 1-based line number

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::CommandRecord;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Yields one `Result<CommandRecord, String>` per data row.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    row: StringRecord,
}

impl SyncReader {
    /// Open a command CSV for streaming
    ///
    /// Fields are trimmed, and rows may omit the trailing amount column.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its header row
    /// cannot be read.
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| format!("Failed to read header of '{}': {}", path.display(), e))?
            .clone();

        Ok(Self {
            reader,
            headers,
            row: StringRecord::new(),
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<CommandRecord, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.reader.read_record(&mut self.row) {
            Ok(false) => return None,
            Ok(true) => self.row.position().map_or(0, |pos| pos.line()),
            Err(e) => {
                let line = e.position().map_or(0, |pos| pos.line());
                return Some(Err(format!("Line {}: CSV parse error: {}", line, e)));
            }
        };

        let parsed = self
            .row
            .deserialize::<CsvRecord>(Some(&self.headers))
            .map_err(|e| format!("CSV parse error: {}", e))
            .and_then(convert_csv_record)
            .map_err(|e| format!("Line {}: {}", line, e));

        Some(parsed)
    }
}
