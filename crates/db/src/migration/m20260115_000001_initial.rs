//! Initial database migration.
//!
//! Creates the users, currencies, and transactions tables and seeds the
//! currency reference data.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(CURRENCIES_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(SEED_CURRENCIES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("DROP TABLE IF EXISTS transactions;").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS currencies;").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS users;").await?;

        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE users (
    id              BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
    email           TEXT NOT NULL UNIQUE,
    full_name       TEXT NOT NULL,
    password_hash   TEXT NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CURRENCIES_SQL: &str = r"
CREATE TABLE currencies (
    code    TEXT PRIMARY KEY,
    name    TEXT NOT NULL
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id              BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
    reference       CHAR(8) NOT NULL UNIQUE,
    sender_id       BIGINT REFERENCES users (id),
    receiver_id     BIGINT NOT NULL REFERENCES users (id),
    debit           NUMERIC(20, 4),
    debit_currency  TEXT REFERENCES currencies (code),
    credit          NUMERIC(20, 4) NOT NULL,
    credit_currency TEXT NOT NULL REFERENCES currencies (code),
    exchange_rate   NUMERIC(20, 8) NOT NULL,
    state           SMALLINT NOT NULL DEFAULT 1,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- The debit leg is present exactly when the row has a sender;
    -- system credits (signup bonus) have neither.
    CONSTRAINT transactions_debit_leg_chk CHECK (
        (sender_id IS NULL AND debit IS NULL AND debit_currency IS NULL)
        OR (sender_id IS NOT NULL AND debit IS NOT NULL AND debit_currency IS NOT NULL)
    ),
    CONSTRAINT transactions_credit_positive_chk CHECK (credit > 0)
);

CREATE INDEX idx_transactions_sender ON transactions (sender_id, debit_currency);
CREATE INDEX idx_transactions_receiver ON transactions (receiver_id, credit_currency);
";

const SEED_CURRENCIES_SQL: &str = r"
INSERT INTO currencies (code, name) VALUES
    ('USD', 'US Dollar'),
    ('EUR', 'Euro'),
    ('GBP', 'British Pound'),
    ('NGN', 'Nigerian Naira'),
    ('UGX', 'Ugandan Shilling');
";
