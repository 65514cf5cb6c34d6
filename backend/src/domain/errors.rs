//! Error taxonomy for the budgeting core.
//!
//! Every variant is recoverable and local: validation errors block the
//! specific write and are reported to the caller, a store failure leaves
//! in-memory state untouched and the user action can simply be retried.

use rust_decimal::Decimal;
use shared::{format_inr, MoneyError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing name/amount, non-numeric or non-positive amount.
    #[error("{0}")]
    InvalidInput(String),

    /// Main category total would exceed available income.
    #[error(
        "total allocation of ₹{} would exceed your available income of ₹{}",
        format_inr(*allocated),
        format_inr(*income)
    )]
    AllocationExceedsIncome { allocated: Decimal, income: Decimal },

    /// Subcategory amount would exceed the parent's remaining budget.
    #[error(
        "amount ₹{} cannot exceed the remaining budget of ₹{}",
        format_inr(*requested),
        format_inr(*remaining)
    )]
    AllocationExceedsParentBudget {
        requested: Decimal,
        remaining: Decimal,
    },

    /// A record refers to a category or expense id that no longer exists.
    #[error("reference to missing record: {0}")]
    OrphanReference(String),

    /// The underlying read/write failed; nothing was mutated.
    #[error("storage unavailable: {0}")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl From<MoneyError> for DomainError {
    fn from(e: MoneyError) -> Self {
        DomainError::InvalidInput(e.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
