//! Currency repository for the currency reference data.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

use crate::entities::currencies;
use pesa_core::currency::CurrencySet;

/// Currency repository for read-only lookups.
#[derive(Debug, Clone)]
pub struct CurrencyRepository {
    db: DatabaseConnection,
}

impl CurrencyRepository {
    /// Creates a new currency repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all currencies.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<currencies::Model>, DbErr> {
        currencies::Entity::find().all(&self.db).await
    }

    /// Loads the set of valid currency codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn codes(&self) -> Result<CurrencySet, DbErr> {
        let models = currencies::Entity::find().all(&self.db).await?;
        Ok(models.into_iter().map(|c| c.code).collect())
    }
}
