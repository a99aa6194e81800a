//! Transaction repository: balance aggregation and the transfer executor.
//!
//! The ledger is append-only. Balances are recomputed from grouped sums on
//! every read, and the transfer critical section (balance check + append)
//! runs inside one database transaction holding an exclusive lock on the
//! sender's row, so concurrent transfers from the same sender serialize
//! while different senders proceed in parallel.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, warn};

use crate::entities::{transactions, users};
use pesa_core::currency::CurrencySet;
use pesa_core::ledger::{
    BalanceSheet, LedgerError, Reference, SIGNUP_BONUS_AMOUNT, SIGNUP_BONUS_CURRENCY,
    TransactionState, TransferRequest, TransferService,
};

/// How many fresh references to try before giving up on a collision streak.
const MAX_REFERENCE_ATTEMPTS: u32 = 3;

/// Result of a successful transfer: the created row plus the sender's
/// recomputed balances, so the caller needs no second round trip.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// The persisted transaction.
    pub transaction: transactions::Model,
    /// The sender's balances after the transfer.
    pub balances: BalanceSheet,
}

/// Transaction repository for ledger reads and the transfer executor.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes an account's per-currency balances.
    ///
    /// Two grouped sums (debits where the account is the sender, credits
    /// where it is the receiver) merged by currency code. An account with
    /// no transactions yields an empty sheet.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn balances(&self, account_id: i64) -> Result<BalanceSheet, DbErr> {
        Self::balances_on(&self.db, account_id).await
    }

    /// Balance aggregation against an arbitrary connection (pool or open
    /// transaction).
    async fn balances_on<C: ConnectionTrait>(
        conn: &C,
        account_id: i64,
    ) -> Result<BalanceSheet, DbErr> {
        let debits: Vec<(Option<String>, Option<Decimal>)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::DebitCurrency)
            .column_as(transactions::Column::Debit.sum(), "total")
            .filter(transactions::Column::SenderId.eq(account_id))
            .group_by(transactions::Column::DebitCurrency)
            .into_tuple()
            .all(conn)
            .await?;

        let credits: Vec<(String, Option<Decimal>)> = transactions::Entity::find()
            .select_only()
            .column(transactions::Column::CreditCurrency)
            .column_as(transactions::Column::Credit.sum(), "total")
            .filter(transactions::Column::ReceiverId.eq(account_id))
            .group_by(transactions::Column::CreditCurrency)
            .into_tuple()
            .all(conn)
            .await?;

        Ok(BalanceSheet::from_partitions(
            debits
                .into_iter()
                .filter_map(|(currency, sum)| Some((currency?, sum.unwrap_or(Decimal::ZERO)))),
            credits
                .into_iter()
                .map(|(currency, sum)| (currency, sum.unwrap_or(Decimal::ZERO))),
        ))
    }

    /// Net balance for one account in one currency.
    async fn balance_for_currency<C: ConnectionTrait>(
        conn: &C,
        account_id: i64,
        currency: &str,
    ) -> Result<Decimal, DbErr> {
        let debit: Option<Option<Decimal>> = transactions::Entity::find()
            .select_only()
            .column_as(transactions::Column::Debit.sum(), "total")
            .filter(transactions::Column::SenderId.eq(account_id))
            .filter(transactions::Column::DebitCurrency.eq(currency))
            .into_tuple()
            .one(conn)
            .await?;

        let credit: Option<Option<Decimal>> = transactions::Entity::find()
            .select_only()
            .column_as(transactions::Column::Credit.sum(), "total")
            .filter(transactions::Column::ReceiverId.eq(account_id))
            .filter(transactions::Column::CreditCurrency.eq(currency))
            .into_tuple()
            .one(conn)
            .await?;

        let debit = debit.flatten().unwrap_or(Decimal::ZERO);
        let credit = credit.flatten().unwrap_or(Decimal::ZERO);
        Ok(credit - debit)
    }

    /// Validates and executes a transfer from `sender_id`.
    ///
    /// The balance check and the append run in one database transaction.
    /// The sender's user row is locked `FOR UPDATE` first, which serializes
    /// this section against any other in-flight transfer from the same
    /// sender and closes the check-then-act race.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] for validation failures (insufficient
    /// balance, unknown currency, missing receiver, ...) or a
    /// `LedgerError::Database` when the storage layer fails.
    pub async fn create_transfer(
        &self,
        sender_id: i64,
        request: &TransferRequest,
        currencies: &CurrencySet,
    ) -> Result<TransferOutcome, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Per-sender serialization point.
        users::Entity::find_by_id(sender_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::Database(format!("sender account {sender_id} not found")))?;

        let receiver_exists = users::Entity::find_by_id(request.receiver_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_some();

        let available =
            Self::balance_for_currency(&txn, sender_id, &request.debit_currency)
                .await
                .map_err(db_err)?;

        TransferService::validate(request, sender_id, available, currencies, receiver_exists)?;

        let transaction = Self::insert_transfer(&txn, sender_id, request).await?;
        txn.commit().await.map_err(db_err)?;

        debug!(
            reference = %transaction.reference,
            sender_id,
            receiver_id = request.receiver_id,
            "transfer recorded"
        );

        let balances = self.balances(sender_id).await.map_err(db_err)?;
        Ok(TransferOutcome {
            transaction,
            balances,
        })
    }

    /// Inserts the transfer row, retrying with a fresh reference if the
    /// unique constraint fires.
    ///
    /// Each attempt runs in its own nested transaction (a savepoint on
    /// Postgres). A unique violation aborts only the savepoint, so after
    /// rolling it back the enclosing transaction stays usable for the
    /// next attempt.
    async fn insert_transfer<C>(
        conn: &C,
        sender_id: i64,
        request: &TransferRequest,
    ) -> Result<transactions::Model, LedgerError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        for attempt in 0..MAX_REFERENCE_ATTEMPTS {
            let reference = Reference::generate();
            let row = transactions::ActiveModel {
                reference: Set(reference.to_string()),
                sender_id: Set(Some(sender_id)),
                receiver_id: Set(request.receiver_id),
                debit: Set(Some(request.debit)),
                debit_currency: Set(Some(request.debit_currency.clone())),
                credit: Set(request.credit),
                credit_currency: Set(request.credit_currency.clone()),
                exchange_rate: Set(request.exchange_rate),
                state: Set(TransactionState::Successful.as_i16()),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            };

            let savepoint = conn.begin().await.map_err(db_err)?;
            match row.insert(&savepoint).await {
                Ok(model) => {
                    savepoint.commit().await.map_err(db_err)?;
                    return Ok(model);
                }
                Err(e) if is_unique_violation(&e) => {
                    savepoint.rollback().await.map_err(db_err)?;
                    warn!(%reference, attempt, "reference collision, regenerating");
                }
                Err(e) => return Err(db_err(e)),
            }
        }

        Err(LedgerError::ReferenceExhausted)
    }

    /// Issues the one-time signup bonus credit for a new account.
    ///
    /// Runs against the caller's open transaction so account creation and
    /// the bonus commit or roll back together.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails or references keep colliding.
    pub async fn insert_signup_bonus<C>(
        conn: &C,
        receiver_id: i64,
    ) -> Result<transactions::Model, DbErr>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        for _ in 0..MAX_REFERENCE_ATTEMPTS {
            let reference = Reference::generate();
            let row = transactions::ActiveModel {
                reference: Set(reference.to_string()),
                sender_id: Set(None),
                receiver_id: Set(receiver_id),
                debit: Set(None),
                debit_currency: Set(None),
                credit: Set(SIGNUP_BONUS_AMOUNT),
                credit_currency: Set(SIGNUP_BONUS_CURRENCY.to_string()),
                exchange_rate: Set(Decimal::ONE),
                state: Set(TransactionState::Successful.as_i16()),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            };

            // Savepoint per attempt so a collision does not abort the
            // registration transaction.
            let savepoint = conn.begin().await?;
            match row.insert(&savepoint).await {
                Ok(model) => {
                    savepoint.commit().await?;
                    return Ok(model);
                }
                Err(e) if is_unique_violation(&e) => {
                    savepoint.rollback().await?;
                    warn!(%reference, "reference collision on signup bonus, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(DbErr::Custom(
            "could not allocate a unique reference for signup bonus".to_string(),
        ))
    }

    /// Lists an account's transactions, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_account(
        &self,
        account_id: i64,
    ) -> Result<Vec<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .filter(
                transactions::Column::SenderId
                    .eq(account_id)
                    .or(transactions::Column::ReceiverId.eq(account_id)),
            )
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .all(&self.db)
            .await
    }
}

fn db_err(e: DbErr) -> LedgerError {
    LedgerError::Database(e.to_string())
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
