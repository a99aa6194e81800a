//! Currency codes, conversion, and display formatting.

pub mod convert;
pub mod format;
pub mod set;

pub use convert::convert_amount;
pub use format::format_amount;
pub use set::CurrencySet;
