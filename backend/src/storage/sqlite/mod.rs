//! SQLite-backed implementations of the storage traits.

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{
    CategoryRepository as SqliteCategoryRepository, ExpenseRepository as SqliteExpenseRepository,
    IncomeRepository as SqliteIncomeRepository, ProfileRepository as SqliteProfileRepository,
};

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a stored TEXT amount back into a decimal. A row that fails here
/// was corrupted outside the application; surface it rather than guess.
pub(crate) fn stored_amount(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw).map_err(|e| anyhow!("Corrupt stored amount {:?}: {}", raw, e))
}
