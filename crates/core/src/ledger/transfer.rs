//! Transfer validation.
//!
//! Pure business rules for creating a transfer, with no database
//! dependencies. The storage layer gathers the sender's available balance,
//! the currency store, and the receiver lookup, then calls
//! [`TransferService::validate`] inside its critical section before
//! appending the record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;
use crate::currency::{CurrencySet, convert_amount};

/// Tolerance when checking `debit * rate` against the supplied credit leg.
///
/// The caller computes the credit amount from a live market rate; the
/// ledger only rejects legs that disagree beyond rounding.
#[must_use]
pub fn rate_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

/// State of a persisted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionState {
    /// Transaction completed.
    Successful,
    /// Transaction failed.
    Failed,
}

impl TransactionState {
    /// Encodes the state for storage (successful = 1, anything else failed).
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::Successful => 1,
            Self::Failed => 0,
        }
    }

    /// Decodes a stored state value.
    #[must_use]
    pub const fn from_i16(value: i16) -> Self {
        match value {
            1 => Self::Successful,
            _ => Self::Failed,
        }
    }
}

/// A transfer request as submitted by the sender.
///
/// The exchange rate is supplied by the caller (fetched from the rates API
/// at form time) and is recorded as-is; the ledger never re-derives it.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    /// The receiving account.
    pub receiver_id: i64,
    /// Amount to debit from the sender.
    pub debit: Decimal,
    /// Currency of the debit leg.
    pub debit_currency: String,
    /// Amount to credit to the receiver.
    pub credit: Decimal,
    /// Currency of the credit leg.
    pub credit_currency: String,
    /// Rate applied: credit = debit * rate.
    pub exchange_rate: Decimal,
}

/// Transfer validation service.
pub struct TransferService;

impl TransferService {
    /// Validates a transfer request against the sender's current balance.
    ///
    /// Checks, in order:
    /// 1. The debit amount is positive
    /// 2. Both currency codes are known
    /// 3. The exchange rate is positive
    /// 4. The credit leg equals `debit * rate` within [`rate_tolerance`]
    /// 5. The sender is not transferring to themselves
    /// 6. The receiver exists
    /// 7. The sender's net balance in the debit currency covers the debit
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a [`LedgerError`].
    pub fn validate(
        request: &TransferRequest,
        sender_id: i64,
        available: Decimal,
        currencies: &CurrencySet,
        receiver_exists: bool,
    ) -> Result<(), LedgerError> {
        if request.debit <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount);
        }

        if !currencies.contains(&request.debit_currency) {
            return Err(LedgerError::InvalidCurrency(request.debit_currency.clone()));
        }
        if !currencies.contains(&request.credit_currency) {
            return Err(LedgerError::InvalidCurrency(request.credit_currency.clone()));
        }

        if request.exchange_rate <= Decimal::ZERO {
            return Err(LedgerError::InvalidExchangeRate);
        }

        let expected = convert_amount(request.debit, request.exchange_rate);
        if (expected - request.credit).abs() > rate_tolerance() {
            return Err(LedgerError::RateMismatch {
                expected,
                actual: request.credit,
            });
        }

        if request.receiver_id == sender_id {
            return Err(LedgerError::SelfTransfer);
        }
        if !receiver_exists {
            return Err(LedgerError::ReceiverNotFound(request.receiver_id));
        }

        if request.debit > available {
            return Err(LedgerError::InsufficientBalance {
                currency: request.debit_currency.clone(),
                available,
                requested: request.debit,
            });
        }

        Ok(())
    }
}
