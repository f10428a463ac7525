//! Balance-related types for the point ledger
//!
//! This module defines the Balance record that holds a user's current point
//! total together with the instant it last changed.

use super::transaction::{Points, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current point balance of a single user
///
/// A record exists only once the user has been charged at least once; the
/// ledger never creates a zero-balance record on a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The user this balance belongs to
    pub user_id: UserId,

    /// Current point total
    ///
    /// Never negative: a use that would drive it below zero is rejected
    /// before the store is touched.
    pub amount: Points,

    /// Instant of the last charge or use
    ///
    /// Monotonically non-decreasing per user.
    pub updated_at: DateTime<Utc>,
}

impl Balance {
    /// Create a balance record
    pub fn new(user_id: UserId, amount: Points, updated_at: DateTime<Utc>) -> Self {
        Balance {
            user_id,
            amount,
            updated_at,
        }
    }

    /// Whether spending `requested` points would overdraw this balance
    pub fn has_insufficient(&self, requested: Points) -> bool {
        self.amount < requested
    }
}

/// Per-user line of the replay summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    /// The user
    pub user_id: UserId,

    /// Final point total
    pub balance: Points,

    /// Number of committed charges and uses
    pub transactions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::more_than_balance(500, 600, true)]
    #[case::less_than_balance(1000, 500, false)]
    #[case::exactly_balance(700, 700, false)]
    #[case::empty_balance(0, 1, true)]
    fn test_has_insufficient(
        #[case] amount: Points,
        #[case] requested: Points,
        #[case] expected: bool,
    ) {
        let balance = Balance::new(111, amount, Utc::now());
        assert_eq!(balance.has_insufficient(requested), expected);
    }
}
