//! Property tests for the ledger core.
//!
//! Runs transfer sequences against an in-memory model of the transaction
//! table and checks the aggregate invariants: conservation of value,
//! no overdraft, and no partial writes on failure.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use super::balance::BalanceSheet;
use super::error::LedgerError;
use super::transfer::{TransferRequest, TransferService};
use crate::currency::CurrencySet;

/// One row of the in-memory transaction table.
#[derive(Debug, Clone)]
struct Row {
    sender: Option<i64>,
    receiver: i64,
    debit: Option<Decimal>,
    debit_currency: Option<String>,
    credit: Decimal,
    credit_currency: String,
}

/// In-memory append-only ledger mirroring the persistence contract.
#[derive(Debug, Default)]
struct Ledger {
    rows: Vec<Row>,
}

impl Ledger {
    fn issue_bonus(&mut self, account: i64, amount: Decimal, currency: &str) {
        self.rows.push(Row {
            sender: None,
            receiver: account,
            debit: None,
            debit_currency: None,
            credit: amount,
            credit_currency: currency.to_string(),
        });
    }

    /// Grouped-sum aggregation, same shape the repository queries produce.
    fn balances(&self, account: i64) -> BalanceSheet {
        let debits = self.rows.iter().filter(|r| r.sender == Some(account)).map(|r| {
            (
                r.debit_currency.clone().unwrap_or_default(),
                r.debit.unwrap_or(Decimal::ZERO),
            )
        });
        let credits = self
            .rows
            .iter()
            .filter(|r| r.receiver == account)
            .map(|r| (r.credit_currency.clone(), r.credit));
        BalanceSheet::from_partitions(debits, credits)
    }

    /// Check-then-append, sequential (the model has no concurrency).
    fn transfer(
        &mut self,
        sender: i64,
        request: &TransferRequest,
        currencies: &CurrencySet,
        accounts: &[i64],
    ) -> Result<(), LedgerError> {
        let available = self.balances(sender).available(&request.debit_currency);
        let receiver_exists = accounts.contains(&request.receiver_id);
        TransferService::validate(request, sender, available, currencies, receiver_exists)?;

        self.rows.push(Row {
            sender: Some(sender),
            receiver: request.receiver_id,
            debit: Some(request.debit),
            debit_currency: Some(request.debit_currency.clone()),
            credit: request.credit,
            credit_currency: request.credit_currency.clone(),
        });
        Ok(())
    }
}

const ACCOUNTS: [i64; 4] = [1, 2, 3, 4];

fn currencies() -> CurrencySet {
    ["USD", "EUR"].into_iter().collect()
}

fn seeded_ledger() -> Ledger {
    let mut ledger = Ledger::default();
    for account in ACCOUNTS {
        ledger.issue_bonus(account, dec!(1000), "USD");
    }
    ledger
}

/// A same-currency transfer attempt: (sender idx, receiver idx, cents).
fn attempt_strategy() -> impl Strategy<Value = (usize, usize, i64)> {
    (0..ACCOUNTS.len(), 0..ACCOUNTS.len(), 1i64..150_000)
}

fn attempts_strategy(max_len: usize) -> impl Strategy<Value = Vec<(usize, usize, i64)>> {
    prop::collection::vec(attempt_strategy(), 1..=max_len)
}

fn usd_request(receiver: i64, amount: Decimal) -> TransferRequest {
    TransferRequest {
        receiver_id: receiver,
        debit: amount,
        debit_currency: "USD".to_string(),
        credit: amount,
        credit_currency: "USD".to_string(),
        exchange_rate: Decimal::ONE,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any sequence of transfer attempts, the total net balance per
    /// currency over all accounts equals exactly the system-issued bonuses.
    #[test]
    fn prop_value_is_conserved(attempts in attempts_strategy(30)) {
        let currencies = currencies();
        let mut ledger = seeded_ledger();

        for (s, r, cents) in attempts {
            let request = usd_request(ACCOUNTS[r], Decimal::new(cents, 2));
            // Failures (self transfer, overdraft) are expected and ignored.
            let _ = ledger.transfer(ACCOUNTS[s], &request, &currencies, &ACCOUNTS);
        }

        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for account in ACCOUNTS {
            for (currency, bal) in ledger.balances(account).iter() {
                *totals.entry(currency.to_string()).or_default() += bal.net();
            }
        }

        let bonus_total = Decimal::from(ACCOUNTS.len() as i64) * dec!(1000);
        prop_assert_eq!(totals.get("USD").copied().unwrap_or_default(), bonus_total);
        prop_assert!(totals.get("EUR").is_none());
    }

    /// No sequence of accepted transfers drives any account's balance
    /// negative in any currency.
    #[test]
    fn prop_no_overdraft(attempts in attempts_strategy(30)) {
        let currencies = currencies();
        let mut ledger = seeded_ledger();

        for (s, r, cents) in attempts {
            let request = usd_request(ACCOUNTS[r], Decimal::new(cents, 2));
            let _ = ledger.transfer(ACCOUNTS[s], &request, &currencies, &ACCOUNTS);
        }

        for account in ACCOUNTS {
            for (currency, bal) in ledger.balances(account).iter() {
                prop_assert!(
                    bal.net() >= Decimal::ZERO,
                    "account {} overdrawn in {}: {}",
                    account,
                    currency,
                    bal.net()
                );
            }
        }
    }

    /// A rejected transfer appends nothing.
    #[test]
    fn prop_rejected_transfer_writes_nothing(cents in 100_001i64..10_000_000) {
        let currencies = currencies();
        let mut ledger = seeded_ledger();
        let before = ledger.rows.len();

        // More than the 1000.00 bonus: must be rejected.
        let request = usd_request(2, Decimal::new(cents, 2));
        let result = ledger.transfer(1, &request, &currencies, &ACCOUNTS);

        prop_assert!(
            matches!(result, Err(LedgerError::InsufficientBalance { .. })),
            "expected InsufficientBalance, got {:?}",
            result
        );
        prop_assert_eq!(ledger.rows.len(), before);
        prop_assert_eq!(ledger.balances(1).available("USD"), dec!(1000));
    }

    /// Every accepted transfer keeps the two legs consistent with the rate.
    #[test]
    fn prop_legs_consistent_with_rate(
        cents in 1i64..100_000,
        rate_millis in 1i64..5_000,
    ) {
        let currencies = currencies();
        let mut ledger = seeded_ledger();

        let debit = Decimal::new(cents, 2);
        let rate = Decimal::new(rate_millis, 3);
        let request = TransferRequest {
            receiver_id: 2,
            debit,
            debit_currency: "USD".to_string(),
            credit: crate::currency::convert_amount(debit, rate),
            credit_currency: "EUR".to_string(),
            exchange_rate: rate,
        };

        if ledger.transfer(1, &request, &currencies, &ACCOUNTS).is_ok() {
            let row = ledger.rows.last().unwrap();
            let expected = crate::currency::convert_amount(row.debit.unwrap(), rate);
            prop_assert!((expected - row.credit).abs() <= super::transfer::rate_tolerance());
        }
    }
}

// ============================================================================
// Scenario tests
// ============================================================================

#[test]
fn test_bonus_then_transfer_scenario() {
    let currencies = currencies();
    let mut ledger = Ledger::default();
    ledger.issue_bonus(1, dec!(1000), "USD");

    let request = usd_request(2, dec!(400));
    ledger.transfer(1, &request, &currencies, &ACCOUNTS).unwrap();

    let sender = ledger.balances(1);
    assert_eq!(sender.get("USD").unwrap().credit, dec!(1000));
    assert_eq!(sender.get("USD").unwrap().debit, dec!(400));
    assert_eq!(sender.available("USD"), dec!(600));

    let receiver = ledger.balances(2);
    assert_eq!(receiver.get("USD").unwrap().credit, dec!(400));
    assert_eq!(receiver.get("USD").unwrap().debit, Decimal::ZERO);
}

#[test]
fn test_overdraft_after_partial_spend() {
    let currencies = currencies();
    let mut ledger = Ledger::default();
    ledger.issue_bonus(1, dec!(1000), "USD");

    ledger
        .transfer(1, &usd_request(2, dec!(400)), &currencies, &ACCOUNTS)
        .unwrap();

    // Net is 600 now, so 700 must fail and leave balances unchanged.
    let result = ledger.transfer(1, &usd_request(2, dec!(700)), &currencies, &ACCOUNTS);
    assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
    assert_eq!(ledger.balances(1).available("USD"), dec!(600));
    assert_eq!(ledger.balances(2).available("USD"), dec!(400));
}

#[test]
fn test_cross_currency_transfer_records_rate() {
    let currencies = currencies();
    let mut ledger = Ledger::default();
    ledger.issue_bonus(1, dec!(1000), "USD");

    let request = TransferRequest {
        receiver_id: 2,
        debit: dec!(100),
        debit_currency: "USD".to_string(),
        credit: dec!(90),
        credit_currency: "EUR".to_string(),
        exchange_rate: dec!(0.9),
    };
    ledger.transfer(1, &request, &currencies, &ACCOUNTS).unwrap();

    let row = ledger.rows.last().unwrap();
    assert_eq!(row.credit, dec!(90));
    assert_eq!(row.credit_currency, "EUR");
    assert_eq!(ledger.balances(2).available("EUR"), dec!(90));
    assert_eq!(ledger.balances(1).available("USD"), dec!(900));
}

#[test]
fn test_account_with_no_transactions_has_empty_sheet() {
    let ledger = Ledger::default();
    assert!(ledger.balances(42).is_empty());
}
