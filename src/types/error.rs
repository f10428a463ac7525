//! Error types for the point ledger
//!
//! This module defines every error a ledger operation can report. Errors carry
//! the user id and the attempted amount so callers can log them or show them
//! to an end user without extra lookups.
//!
//! # Error Categories
//!
//! - **Input Errors**: non-positive amounts, amounts outside the configured policy
//! - **Lookup Errors**: no balance or history recorded for a user
//! - **Business-Rule Errors**: a use larger than the current balance
//! - **Internal Errors**: poisoned per-user locks
//!
//! None of these is fatal to the process; [`LedgerError::kind`] groups them so
//! an adapter can choose a status code per category.

use crate::types::transaction::{Points, TransactionKind, UserId};
use thiserror::Error;

/// Coarse category of a [`LedgerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is malformed or outside policy
    InvalidInput,
    /// No record exists for the user
    NotFound,
    /// The user's balance cannot cover the request
    InsufficientBalance,
    /// Unexpected fault inside the ledger
    Internal,
}

/// Main error type for the point ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Amount is zero or negative
    ///
    /// Rejected before any lock is taken; nothing is mutated.
    #[error("Invalid amount {amount} for user {user_id}: amount must be greater than zero")]
    InvalidAmount {
        /// User the request targeted
        user_id: UserId,
        /// The rejected amount
        amount: Points,
    },

    /// Amount falls outside the configured policy range for the operation
    #[error("{kind} amount {amount} for user {user_id} is outside the allowed range {min}..={max}")]
    AmountOutOfRange {
        /// User the request targeted
        user_id: UserId,
        /// Operation whose range was violated
        kind: TransactionKind,
        /// The rejected amount
        amount: Points,
        /// Smallest accepted amount
        min: Points,
        /// Largest accepted amount
        max: Points,
    },

    /// A charge or use command arrived without an amount
    #[error("{kind} for user {user_id} requires an amount")]
    MissingAmount {
        /// User the command targeted
        user_id: UserId,
        /// Operation missing its amount
        kind: TransactionKind,
    },

    /// No balance or history exists for the user
    #[error("User {user_id} not found")]
    UserNotFound {
        /// The unknown user
        user_id: UserId,
    },

    /// Use amount exceeds the current balance
    ///
    /// Balance and history are left unchanged.
    #[error("Insufficient balance for user {user_id}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// User the request targeted
        user_id: UserId,
        /// Balance at the time of the check
        balance: Points,
        /// Amount the caller tried to use
        requested: Points,
    },

    /// The new balance would not fit in the point type
    #[error("Arithmetic overflow in {kind} for user {user_id}")]
    ArithmeticOverflow {
        /// User the request targeted
        user_id: UserId,
        /// Operation that would overflow
        kind: TransactionKind,
    },

    /// A previous holder of the user's lock panicked
    ///
    /// The stores may hold a half-applied change for this user.
    #[error("Lock for user {user_id} is poisoned")]
    LockPoisoned {
        /// User whose lock is poisoned
        user_id: UserId,
    },
}

impl LedgerError {
    /// Category of this error, for mapping to transport status codes
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidAmount { .. }
            | LedgerError::AmountOutOfRange { .. }
            | LedgerError::MissingAmount { .. }
            | LedgerError::ArithmeticOverflow { .. } => ErrorKind::InvalidInput,
            LedgerError::UserNotFound { .. } => ErrorKind::NotFound,
            LedgerError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            LedgerError::LockPoisoned { .. } => ErrorKind::Internal,
        }
    }

    /// Whether this error signals a fault inside the ledger rather than a rejected request
    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(user_id: UserId, amount: Points) -> Self {
        LedgerError::InvalidAmount { user_id, amount }
    }

    /// Create an AmountOutOfRange error
    pub fn amount_out_of_range(
        user_id: UserId,
        kind: TransactionKind,
        amount: Points,
        min: Points,
        max: Points,
    ) -> Self {
        LedgerError::AmountOutOfRange {
            user_id,
            kind,
            amount,
            min,
            max,
        }
    }

    /// Create a MissingAmount error
    pub fn missing_amount(user_id: UserId, kind: TransactionKind) -> Self {
        LedgerError::MissingAmount { user_id, kind }
    }

    /// Create a UserNotFound error
    pub fn user_not_found(user_id: UserId) -> Self {
        LedgerError::UserNotFound { user_id }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(user_id: UserId, balance: Points, requested: Points) -> Self {
        LedgerError::InsufficientBalance {
            user_id,
            balance,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(user_id: UserId, kind: TransactionKind) -> Self {
        LedgerError::ArithmeticOverflow { user_id, kind }
    }

    /// Create a LockPoisoned error
    pub fn lock_poisoned(user_id: UserId) -> Self {
        LedgerError::LockPoisoned { user_id }
    }
}
