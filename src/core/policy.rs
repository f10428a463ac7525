//! Amount policy configuration
//!
//! The ledger's durable invariant is only `amount > 0`. Deployments may narrow
//! the accepted charge and use amounts further (for example "charges must
//! exceed 1000 points, uses must stay below 5000"); those bounds live here as
//! configuration instead of being hard-wired into the service.

use crate::types::{LedgerError, Points, TransactionKind, UserId};

/// Inclusive range of accepted amounts for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRange {
    /// Smallest accepted amount
    pub min: Points,
    /// Largest accepted amount
    pub max: Points,
}

impl AmountRange {
    /// Create a range, clamping `min` to at least 1
    ///
    /// Non-positive amounts are always invalid, so a lower minimum would
    /// never take effect.
    pub fn new(min: Points, max: Points) -> Self {
        Self {
            min: min.max(1),
            max,
        }
    }

    /// Whether `amount` lies inside the range
    pub fn contains(&self, amount: Points) -> bool {
        (self.min..=self.max).contains(&amount)
    }
}

impl Default for AmountRange {
    fn default() -> Self {
        Self {
            min: 1,
            max: Points::MAX,
        }
    }
}

/// Accepted amounts per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AmountPolicy {
    /// Range for charges
    pub charge: AmountRange,
    /// Range for uses
    pub use_points: AmountRange,
}

impl AmountPolicy {
    /// Range configured for an operation
    pub fn range(&self, kind: TransactionKind) -> AmountRange {
        match kind {
            TransactionKind::Charge => self.charge,
            TransactionKind::Use => self.use_points,
        }
    }

    /// Validate a request amount against the durable invariant and the policy
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvalidAmount` if `amount <= 0`
    /// * `LedgerError::AmountOutOfRange` if `amount` is outside the configured range
    pub fn check(
        &self,
        user_id: UserId,
        kind: TransactionKind,
        amount: Points,
    ) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::invalid_amount(user_id, amount));
        }

        let range = self.range(kind);
        if !range.contains(amount) {
            return Err(LedgerError::amount_out_of_range(
                user_id, kind, amount, range.min, range.max,
            ));
        }

        Ok(())
    }
}

/// Ledger service configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerConfig {
    /// Accepted charge/use amounts
    pub policy: AmountPolicy,
}
