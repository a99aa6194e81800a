//! Ledger error types for transfer validation and persistence.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::currency::format_amount;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Sender balance does not cover the requested debit.
    #[error("{}", insufficient_balance_message(.currency, *.available, *.requested))]
    InsufficientBalance {
        /// The debit currency code.
        currency: String,
        /// The sender's net balance in the debit currency.
        available: Decimal,
        /// The requested debit amount.
        requested: Decimal,
    },

    /// Currency code is not in the currency store.
    #[error("Unknown currency code: {0}")]
    InvalidCurrency(String),

    /// Debit amount must be positive.
    #[error("Transfer amount must be positive")]
    NonPositiveAmount,

    /// Exchange rate must be positive.
    #[error("Exchange rate must be positive")]
    InvalidExchangeRate,

    /// The credit leg does not match debit * rate.
    #[error("Credit amount {actual} does not match debit * rate = {expected}")]
    RateMismatch {
        /// Expected credit amount (debit * rate, rounded).
        expected: Decimal,
        /// Credit amount supplied by the caller.
        actual: Decimal,
    },

    // ========== Account Errors ==========
    /// Receiver account does not exist.
    #[error("Receiver account not found: {0}")]
    ReceiverNotFound(i64),

    /// Sender and receiver are the same account.
    #[error("Cannot transfer to your own account")]
    SelfTransfer,

    // ========== Persistence Errors ==========
    /// Reference number generation kept colliding.
    #[error("Could not allocate a unique reference number")]
    ReferenceExhausted,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

fn insufficient_balance_message(currency: &str, available: Decimal, requested: Decimal) -> String {
    format!(
        "Insufficient balance: available {}, requested {}",
        format_amount(currency, available),
        format_amount(currency, requested)
    )
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::InvalidCurrency(_) => "INVALID_CURRENCY",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::InvalidExchangeRate => "INVALID_EXCHANGE_RATE",
            Self::RateMismatch { .. } => "RATE_MISMATCH",
            Self::ReceiverNotFound(_) => "RECEIVER_NOT_FOUND",
            Self::SelfTransfer => "SELF_TRANSFER",
            Self::ReferenceExhausted => "REFERENCE_EXHAUSTED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - user-correctable validation failures
            Self::InsufficientBalance { .. }
            | Self::InvalidCurrency(_)
            | Self::NonPositiveAmount
            | Self::InvalidExchangeRate
            | Self::RateMismatch { .. }
            | Self::SelfTransfer => 400,

            // 404 Not Found
            Self::ReceiverNotFound(_) => 404,

            // 500 Internal Server Error
            Self::ReferenceExhausted | Self::Database(_) => 500,
        }
    }

    /// Returns true if this error is retryable by the caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ReferenceExhausted | Self::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_balance_message() {
        let err = LedgerError::InsufficientBalance {
            currency: "USD".to_string(),
            available: dec!(600),
            requested: dec!(700),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: available USD 600.00, requested USD 700.00"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InvalidCurrency("XXX".into()).error_code(),
            "INVALID_CURRENCY"
        );
        assert_eq!(LedgerError::NonPositiveAmount.error_code(), "NON_POSITIVE_AMOUNT");
        assert_eq!(LedgerError::SelfTransfer.error_code(), "SELF_TRANSFER");
    }

    #[test]
    fn test_http_status_codes() {
        let low = LedgerError::InsufficientBalance {
            currency: "USD".to_string(),
            available: dec!(0),
            requested: dec!(1),
        };
        assert_eq!(low.http_status_code(), 400);
        assert_eq!(LedgerError::ReceiverNotFound(9).http_status_code(), 404);
        assert_eq!(LedgerError::Database("oops".into()).http_status_code(), 500);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LedgerError::Database("oops".into()).is_retryable());
        assert!(LedgerError::ReferenceExhausted.is_retryable());
        assert!(!LedgerError::NonPositiveAmount.is_retryable());
    }
}
