//! `SeaORM` Entity for the transactions table.
//!
//! Rows are append-only: a transaction is never mutated or deleted after
//! insertion. A NULL `sender_id` marks a system-originated credit (signup
//! bonus); such rows carry no debit leg.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 8 hex chars from 4 random bytes, unique.
    #[sea_orm(unique)]
    pub reference: String,
    pub sender_id: Option<i64>,
    pub receiver_id: i64,
    pub debit: Option<Decimal>,
    pub debit_currency: Option<String>,
    pub credit: Decimal,
    pub credit_currency: String,
    /// Ratio credit/debit recorded at transfer time.
    pub exchange_rate: Decimal,
    /// 1 = successful, anything else = failed.
    pub state: i16,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SenderId",
        to = "super::users::Column::Id"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReceiverId",
        to = "super::users::Column::Id"
    )]
    Receiver,
    #[sea_orm(
        belongs_to = "super::currencies::Entity",
        from = "Column::CreditCurrency",
        to = "super::currencies::Column::Code"
    )]
    CreditCurrency,
}

impl ActiveModelBehavior for ActiveModel {}
