//! Repository abstractions for data access.

pub mod currency;
pub mod transaction;
pub mod user;

pub use currency::CurrencyRepository;
pub use transaction::{TransactionRepository, TransferOutcome};
pub use user::UserRepository;
