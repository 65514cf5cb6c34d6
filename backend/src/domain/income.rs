//! Income composition: the single available-income figure that every
//! allocation check runs against.

use rust_decimal::Decimal;
use shared::{Income, IncomeType};

/// Earned/borrowed breakdown of the user's current income row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeSummary {
    pub earned: Decimal,
    pub borrowed: Decimal,
    pub total_available: Decimal,
}

impl IncomeSummary {
    /// Compose the summary from the most recent income row and the user's
    /// borrowed-income toggle. With no income row everything is zero;
    /// category creation is still allowed, the allocation check against
    /// zero income simply rejects any positive main category amount.
    ///
    /// This is recomputed from the snapshot on every use. Caching it across
    /// a toggle flip or a new income row would let stale figures gate
    /// allocations.
    pub fn compose(latest: Option<&Income>, include_borrowed: bool) -> Self {
        let (earned, borrowed) = match latest {
            Some(income) => match income.income_type {
                IncomeType::Salary => (income.amount, Decimal::ZERO),
                IncomeType::Borrowed => (Decimal::ZERO, income.amount),
            },
            None => (Decimal::ZERO, Decimal::ZERO),
        };

        let total_available = if include_borrowed {
            earned + borrowed
        } else {
            earned
        };

        Self {
            earned,
            borrowed,
            total_available,
        }
    }
}
