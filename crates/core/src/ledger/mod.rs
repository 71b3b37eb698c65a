//! Posting rules and account balance arithmetic.
//!
//! This module implements the core ledger functionality:
//! - Transaction kinds and balance directions
//! - Amount validation
//! - The mapping from a posting to its balance adjustments
//! - In-memory balance replay for reconciliation
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::{AccountBalance, Reconciliation};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{BalanceAdjustment, BalanceDirection, PostTransactionInput, TransactionKind};
