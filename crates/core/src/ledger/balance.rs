//! Per-currency balance aggregation.
//!
//! Balances are never stored: they are a pure function of the transaction
//! set, recomputed on every read. The storage layer supplies two grouped
//! sums (debits by currency where the account is the sender, credits by
//! currency where it is the receiver) and this module merges them.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Credit and debit totals for one account in one currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyBalance {
    /// Total credited to the account in this currency.
    pub credit: Decimal,
    /// Total debited from the account in this currency.
    pub debit: Decimal,
}

impl CurrencyBalance {
    /// Net balance: credit minus debit.
    ///
    /// May be negative; the transfer validator is what prevents a new
    /// transaction from driving the sender's debit currency negative.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.credit - self.debit
    }
}

/// An account's balances across all currencies it has touched.
///
/// An account with no transactions has an empty sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSheet {
    balances: BTreeMap<String, CurrencyBalance>,
}

impl BalanceSheet {
    /// Builds a balance sheet from grouped debit and credit sums.
    ///
    /// A currency present in only one partition gets the other side
    /// defaulted to zero.
    #[must_use]
    pub fn from_partitions(
        debits: impl IntoIterator<Item = (String, Decimal)>,
        credits: impl IntoIterator<Item = (String, Decimal)>,
    ) -> Self {
        let mut balances: BTreeMap<String, CurrencyBalance> = BTreeMap::new();

        for (currency, sum) in debits {
            balances.entry(currency).or_default().debit += sum;
        }
        for (currency, sum) in credits {
            balances.entry(currency).or_default().credit += sum;
        }

        Self { balances }
    }

    /// Net balance available in the given currency, zero if never touched.
    #[must_use]
    pub fn available(&self, currency: &str) -> Decimal {
        self.balances
            .get(currency)
            .map_or(Decimal::ZERO, CurrencyBalance::net)
    }

    /// Returns the balance entry for a currency, if any.
    #[must_use]
    pub fn get(&self, currency: &str) -> Option<&CurrencyBalance> {
        self.balances.get(currency)
    }

    /// Returns true if the account has no transactions in any currency.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Iterates over (currency, balance) pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CurrencyBalance)> {
        self.balances.iter().map(|(c, b)| (c.as_str(), b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_sheet() {
        let sheet = BalanceSheet::from_partitions([], []);
        assert!(sheet.is_empty());
        assert_eq!(sheet.available("USD"), Decimal::ZERO);
        assert!(sheet.get("USD").is_none());
    }

    #[test]
    fn test_merge_partitions() {
        let sheet = BalanceSheet::from_partitions(
            [("USD".to_string(), dec!(400))],
            [("USD".to_string(), dec!(1000)), ("EUR".to_string(), dec!(90))],
        );

        assert_eq!(
            sheet.get("USD"),
            Some(&CurrencyBalance {
                credit: dec!(1000),
                debit: dec!(400),
            })
        );
        assert_eq!(sheet.available("USD"), dec!(600));

        // EUR only appears on the credit side; debit defaults to zero.
        assert_eq!(
            sheet.get("EUR"),
            Some(&CurrencyBalance {
                credit: dec!(90),
                debit: Decimal::ZERO,
            })
        );
        assert_eq!(sheet.available("EUR"), dec!(90));
    }

    #[test]
    fn test_debit_only_currency() {
        // Data issue: more sent than received. The aggregator still computes it.
        let sheet = BalanceSheet::from_partitions([("GBP".to_string(), dec!(50))], []);
        assert_eq!(sheet.available("GBP"), dec!(-50));
    }

    #[test]
    fn test_duplicate_currency_rows_accumulate() {
        let sheet = BalanceSheet::from_partitions(
            [("USD".to_string(), dec!(10)), ("USD".to_string(), dec!(5))],
            [("USD".to_string(), dec!(100))],
        );
        assert_eq!(sheet.available("USD"), dec!(85));
    }

    #[test]
    fn test_iter_sorted_by_code() {
        let sheet = BalanceSheet::from_partitions(
            [],
            [
                ("NGN".to_string(), dec!(1)),
                ("EUR".to_string(), dec!(1)),
                ("USD".to_string(), dec!(1)),
            ],
        );
        let codes: Vec<&str> = sheet.iter().map(|(c, _)| c).collect();
        assert_eq!(codes, vec!["EUR", "NGN", "USD"]);
    }
}
