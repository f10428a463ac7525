//! CSV format handling for replay commands and summary output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain commands
//! - Summary output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{BalanceSummary, CommandRecord, CommandType, Points, UserId};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: op, user, amount.
/// The amount field is optional because balance and history reads carry none.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub user: UserId,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to a CommandRecord
///
/// This function:
/// - Parses the op string (case-insensitive) into a CommandType
/// - Rejects user id 0; only positive ids reach the ledger
/// - Parses the amount (if present) as a signed integer, so non-positive
///   amounts are left for the ledger to reject
/// - Requires an amount for charge and use
///
/// # Returns
///
/// * `Ok(CommandRecord)` - Successfully converted record
/// * `Err(String)` - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<CommandRecord, String> {
    let op = match csv_record.op.to_lowercase().as_str() {
        "charge" => CommandType::Charge,
        "use" => CommandType::Use,
        "balance" => CommandType::Balance,
        "history" => CommandType::History,
        _ => {
            return Err(format!(
                "Invalid op '{}' for user {}",
                csv_record.op, csv_record.user
            ))
        }
    };

    if csv_record.user == 0 {
        return Err("User id must be positive".to_string());
    }

    let amount = match csv_record.amount {
        Some(amount_str) if !amount_str.trim().is_empty() => {
            match amount_str.trim().parse::<Points>() {
                Ok(amount) => Some(amount),
                Err(_) => {
                    return Err(format!(
                        "Invalid amount '{}' for user {}",
                        amount_str, csv_record.user
                    ))
                }
            }
        }
        _ => None,
    };

    // Reads ignore any amount provided
    if let Some(kind) = op.transaction_kind() {
        if amount.is_none() {
            return Err(format!(
                "{} for user {} requires an amount",
                kind, csv_record.user
            ));
        }
    }

    Ok(CommandRecord {
        op,
        user_id: csv_record.user,
        amount,
    })
}

/// Write the per-user summary in CSV format
///
/// Columns: user, balance, transactions. Rows are written in the order
/// given; [`PointLedger::summaries`](crate::core::PointLedger::summaries)
/// already returns them sorted by user id.
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_summary_csv(
    summaries: &[BalanceSummary],
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["user", "balance", "transactions"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for summary in summaries {
        writer
            .write_record(&[
                summary.user_id.to_string(),
                summary.balance.to_string(),
                summary.transactions.to_string(),
            ])
            .map_err(|e| format!("Failed to write summary record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn csv_record(op: &str, user: UserId, amount: Option<&str>) -> CsvRecord {
        CsvRecord {
            op: op.to_string(),
            user,
            amount: amount.map(|s| s.to_string()),
        }
    }

    #[rstest]
    #[case("charge", CommandType::Charge, "1000", 1000)]
    #[case("use", CommandType::Use, "500", 500)]
    #[case("CHARGE", CommandType::Charge, "10", 10)] // case insensitive
    #[case("use", CommandType::Use, "-5", -5)] // left for the ledger to reject
    #[case("charge", CommandType::Charge, "  250  ", 250)] // whitespace trimming
    fn test_convert_csv_record_with_amount(
        #[case] op: &str,
        #[case] expected_op: CommandType,
        #[case] amount: &str,
        #[case] expected_amount: Points,
    ) {
        let record = convert_csv_record(csv_record(op, 111, Some(amount))).unwrap();

        assert_eq!(record.op, expected_op);
        assert_eq!(record.user_id, 111);
        assert_eq!(record.amount, Some(expected_amount));
    }

    #[rstest]
    #[case("balance", CommandType::Balance, None)]
    #[case("history", CommandType::History, None)]
    #[case("Balance", CommandType::Balance, Some(""))]
    fn test_convert_csv_record_reads(
        #[case] op: &str,
        #[case] expected_op: CommandType,
        #[case] amount: Option<&str>,
    ) {
        let record = convert_csv_record(csv_record(op, 7, amount)).unwrap();

        assert_eq!(record.op, expected_op);
        assert_eq!(record.amount, None);
    }

    #[rstest]
    #[case::invalid_op("deposit", 1, Some("100"), "Invalid op")]
    #[case::zero_user("charge", 0, Some("100"), "User id must be positive")]
    #[case::charge_missing_amount("charge", 1, None, "requires an amount")]
    #[case::use_missing_amount("use", 1, None, "requires an amount")]
    #[case::empty_amount("charge", 1, Some(""), "requires an amount")]
    #[case::whitespace_amount("use", 1, Some("  "), "requires an amount")]
    #[case::invalid_amount("charge", 1, Some("ten"), "Invalid amount")]
    #[case::fractional_amount("charge", 1, Some("10.5"), "Invalid amount")]
    fn test_convert_csv_record_errors(
        #[case] op: &str,
        #[case] user: UserId,
        #[case] amount: Option<&str>,
        #[case] expected_error: &str,
    ) {
        let result = convert_csv_record(csv_record(op, user, amount));

        assert!(result.unwrap_err().contains(expected_error));
    }

    #[rstest]
    #[case::single_user(
        vec![BalanceSummary { user_id: 111, balance: 5500, transactions: 4 }],
        "user,balance,transactions\n111,5500,4\n"
    )]
    #[case::keeps_given_order(
        vec![
            BalanceSummary { user_id: 3, balance: 30, transactions: 1 },
            BalanceSummary { user_id: 1, balance: 0, transactions: 2 },
            BalanceSummary { user_id: 2, balance: 20, transactions: 1 },
        ],
        "user,balance,transactions\n3,30,1\n1,0,2\n2,20,1\n"
    )]
    #[case::empty(vec![], "user,balance,transactions\n")]
    fn test_write_summary_csv(
        #[case] summaries: Vec<BalanceSummary>,
        #[case] expected_output: &str,
    ) {
        let mut output = Vec::new();

        write_summary_csv(&summaries, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), expected_output);
    }
}
