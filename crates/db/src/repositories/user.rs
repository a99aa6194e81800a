//! User repository for account database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{transactions, users};
use crate::repositories::transaction::TransactionRepository;

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new user and issues their signup bonus in one atomic unit.
    ///
    /// A failure after the user insert rolls both writes back, so an
    /// account can never exist without its starting balance.
    ///
    /// # Errors
    ///
    /// Returns an error if either insert fails.
    pub async fn create_with_bonus(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> Result<(users::Model, transactions::Model), DbErr> {
        let txn = self.db.begin().await?;

        let user = users::ActiveModel {
            email: Set(email.to_string()),
            full_name: Set(full_name.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };
        let user = user.insert(&txn).await?;

        let bonus = TransactionRepository::insert_signup_bonus(&txn, user.id).await?;

        txn.commit().await?;
        Ok((user, bonus))
    }

    /// Lists all users except the given one, for recipient selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_recipients(&self, exclude_id: i64) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Id.ne(exclude_id))
            .order_by_asc(users::Column::FullName)
            .all(&self.db)
            .await
    }
}
