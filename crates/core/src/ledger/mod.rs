//! Balance aggregation and transfer validation.
//!
//! This module implements the ledger core:
//! - Per-currency balance sheets derived from grouped transaction sums
//! - Transfer request validation (overdraft, currency, rate checks)
//! - Reference number generation
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod reference;
pub mod transfer;

#[cfg(test)]
mod transfer_props;

use rust_decimal::Decimal;

pub use balance::{BalanceSheet, CurrencyBalance};
pub use error::LedgerError;
pub use reference::{REFERENCE_LEN, Reference};
pub use transfer::{TransactionState, TransferRequest, TransferService};

/// Amount credited to every newly created account.
pub const SIGNUP_BONUS_AMOUNT: Decimal = Decimal::ONE_THOUSAND;

/// Currency of the signup bonus.
pub const SIGNUP_BONUS_CURRENCY: &str = "USD";
