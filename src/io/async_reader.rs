//! Asynchronous CSV reader with batch interface
//!
//! ```text
//! AsyncRead → csv-async deserializer → AsyncReader::read_batch → Vec<CommandRecord>
//!                                          ↓
//!                                  csv_format::convert_csv_record
//! ```
//!
//! Rows that fail to parse or convert are logged and skipped, so a batch
//! only ever holds commands the ledger can be asked to run.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::CommandRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Upper bound on the space reserved up front for one batch
///
/// Larger batches still fill up; the vector just grows as rows arrive.
const MAX_PREALLOCATED_ROWS: usize = 4096;

/// Asynchronous CSV reader
///
/// Provides a batch reading interface over replay commands while keeping
/// streaming behavior: only the current batch is held in memory.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    rows_read: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    ///
    /// Fields are trimmed, rows may omit the trailing amount column, and the
    /// first row is taken as the header.
    ///
    /// # Arguments
    ///
    /// * `reader` - Async reader providing CSV data
    ///
    /// # Returns
    ///
    /// A new AsyncReader instance
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            rows_read: 0,
        }
    }

    /// Read a batch of commands
    ///
    /// Reads rows until `batch_size` valid commands are collected or the
    /// input ends. Rows that fail to parse or convert are logged with their
    /// line number and skipped.
    ///
    /// # Arguments
    ///
    /// * `batch_size` - Maximum number of commands to return
    ///
    /// # Returns
    ///
    /// The valid commands in file order. Returns an empty vector once the
    /// input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<CommandRecord> {
        let mut batch = Vec::with_capacity(batch_size.min(MAX_PREALLOCATED_ROWS));
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let Some(next) = records.next().await else {
                break;
            };
            self.rows_read += 1;
            // +1 for the header row
            let line = self.rows_read + 1;

            match next.map_err(|e| format!("CSV parse error: {}", e)) {
                Ok(csv_record) => match convert_csv_record(csv_record) {
                    Ok(record) => batch.push(record),
                    Err(e) => tracing::warn!(line, error = %e, "skipping row"),
                },
                Err(e) => tracing::warn!(line, error = %e, "skipping row"),
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommandType;
    use futures::io::Cursor;

    fn reader(content: &'static str) -> AsyncReader<Cursor<&'static [u8]>> {
        AsyncReader::new(Cursor::new(content.as_bytes()))
    }

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let mut async_reader = reader("op,user,amount\ncharge,1,100\nuse,1,50\ncharge,2,200\n");

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].op, CommandType::Charge);
        assert_eq!(batch[1].op, CommandType::Use);
        assert_eq!(batch[1].amount, Some(50));

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].user_id, 2);

        assert!(async_reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_unbounded_batch_size_reads_everything() {
        let mut async_reader = reader("op,user,amount\ncharge,1,100\ncharge,2,200\n");

        let batch = async_reader.read_batch(usize::MAX).await;

        assert_eq!(batch.len(), 2);
        assert!(async_reader.read_batch(usize::MAX).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut async_reader = reader("op,user,amount\n");

        assert!(async_reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_rows() {
        let mut async_reader = reader(
            "op,user,amount\n\
             refund,1,100\n\
             charge,0,100\n\
             charge,x,100\n\
             use,1,\n\
             charge,3,75\n",
        );

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].user_id, 3);
    }

    #[tokio::test]
    async fn test_async_reader_reads_without_amount_column() {
        let mut async_reader = reader("op,user,amount\nbalance,5\n  HISTORY , 5 ,\n");

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].op, CommandType::Balance);
        assert_eq!(batch[1].op, CommandType::History);
        assert!(batch.iter().all(|r| r.amount.is_none()));
    }
}
