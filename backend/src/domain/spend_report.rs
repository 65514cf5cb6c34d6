//! Spend aggregation over the in-memory snapshot.
//!
//! Pure, synchronous sums used by the budget and reports screens. Expenses
//! whose `category_id` no longer resolves to a live category (left behind
//! by the non-atomic category delete) are skipped by the per-category
//! figures rather than failing the whole report.

use crate::domain::category_tree::CategoryTree;
use chrono::{DateTime, Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use shared::{BudgetCategory, Expense, MonthlySpend};
use std::collections::HashMap;

/// Spend in `category_id` and all of its descendants.
pub fn category_spending(tree: &CategoryTree<'_>, expenses: &[Expense], category_id: &str) -> Decimal {
    tree.spent_in_subtree(expenses, category_id)
}

/// Total allocated across main categories only. Subcategory amounts divide
/// their parent's allocation and must never be counted again.
pub fn total_allocated(categories: &[BudgetCategory]) -> Decimal {
    categories
        .iter()
        .filter(|c| c.is_main())
        .map(|c| c.amount)
        .sum()
}

/// Sum of all expense amounts, unconditionally (orphans included).
pub fn total_spent(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(|e| e.amount).sum()
}

/// The calendar date an expense was logged on, if its timestamp parses.
/// Unparseable rows are excluded from time-bucketed figures.
pub fn expense_date(expense: &Expense) -> Option<NaiveDate> {
    let raw = expense.created_at.as_str();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Spend with a logged date in `[start, end]`, both ends inclusive.
pub fn period_spend(expenses: &[Expense], start: NaiveDate, end: NaiveDate) -> Decimal {
    expenses
        .iter()
        .filter_map(|e| expense_date(e).map(|date| (date, e.amount)))
        .filter(|(date, _)| *date >= start && *date <= end)
        .map(|(_, amount)| amount)
        .sum()
}

/// Trailing six calendar months of spend, oldest bucket first. Labels are
/// short month names with a two-digit year ("Mar 25").
pub fn monthly_trend(expenses: &[Expense], today: NaiveDate) -> Vec<MonthlySpend> {
    let first_of_month = today - Days::new(u64::from(today.day0()));

    let mut trend = Vec::with_capacity(6);
    for months_back in (0..6).rev() {
        let Some(start) = first_of_month.checked_sub_months(Months::new(months_back)) else {
            continue;
        };
        let Some(end) = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.checked_sub_days(Days::new(1)))
        else {
            continue;
        };

        trend.push(MonthlySpend {
            label: month_label(start),
            amount: period_spend(expenses, start, end),
        });
    }
    trend
}

fn month_label(date: NaiveDate) -> String {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    format!(
        "{} {:02}",
        MONTHS[date.month0() as usize],
        date.year().rem_euclid(100)
    )
}

/// The largest per-category spend total, over categories that still exist
/// and have at least one expense; zero when there are none.
pub fn top_category_spend(tree: &CategoryTree<'_>, expenses: &[Expense]) -> Decimal {
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for expense in expenses {
        if tree.get(&expense.category_id).is_some() {
            *totals.entry(expense.category_id.as_str()).or_default() += expense.amount;
        }
    }
    totals.into_values().max().unwrap_or(Decimal::ZERO)
}

/// Percent of allocation used; `None` means "no budget set", which is a
/// display distinction rather than an error.
pub fn percent_used(spent: Decimal, allocated: Decimal) -> Option<Decimal> {
    if allocated > Decimal::ZERO {
        Some(spent / allocated * Decimal::ONE_HUNDRED)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn category(id: &str, amount: Decimal, parent_id: Option<&str>) -> BudgetCategory {
        BudgetCategory {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            name: id.to_string(),
            amount,
            parent_id: parent_id.map(|p| p.to_string()),
            created_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    fn expense_on(category_id: &str, amount: Decimal, created_at: &str) -> Expense {
        Expense {
            id: Expense::generate_id(),
            user_id: "user-1".to_string(),
            category_id: category_id.to_string(),
            amount,
            description: None,
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_total_allocated_counts_main_categories_only() {
        // Double-count regression: a root of 10,000 with a child of 4,000
        // must report 10,000.
        let categories = vec![
            category("needs", dec!(10000), None),
            category("groceries", dec!(4000), Some("needs")),
        ];
        assert_eq!(total_allocated(&categories), dec!(10000));
    }

    #[test]
    fn test_total_spent_is_unconditional() {
        let expenses = vec![
            expense_on("needs", dec!(100), "2025-06-01T10:00:00Z"),
            expense_on("category::gone", dec!(50), "2025-06-02T10:00:00Z"),
        ];
        assert_eq!(total_spent(&expenses), dec!(150));
    }

    #[test]
    fn test_category_spending_includes_descendants() {
        let categories = vec![
            category("needs", dec!(10000), None),
            category("groceries", dec!(3000), Some("needs")),
        ];
        let expenses = vec![
            expense_on("needs", dec!(1000), "2025-06-01T10:00:00Z"),
            expense_on("groceries", dec!(2000), "2025-06-02T10:00:00Z"),
        ];
        let tree = CategoryTree::new(&categories);
        assert_eq!(category_spending(&tree, &expenses, "needs"), dec!(3000));
        assert_eq!(category_spending(&tree, &expenses, "groceries"), dec!(2000));
    }

    #[test]
    fn test_period_spend_bounds_are_inclusive() {
        let expenses = vec![
            expense_on("needs", dec!(10), "2025-06-01T00:00:00Z"),
            expense_on("needs", dec!(20), "2025-06-15T23:59:00Z"),
            expense_on("needs", dec!(40), "2025-06-16T00:00:00Z"),
        ];
        let start = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(period_spend(&expenses, start, end), dec!(30));
    }

    #[test]
    fn test_period_spend_skips_unparseable_dates() {
        let expenses = vec![
            expense_on("needs", dec!(10), "2025-06-01T00:00:00Z"),
            expense_on("needs", dec!(99), "not-a-date"),
        ];
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(period_spend(&expenses, day, day), dec!(10));
    }

    #[test]
    fn test_monthly_trend_six_buckets_oldest_first() {
        let expenses = vec![
            expense_on("needs", dec!(100), "2025-01-10T10:00:00Z"),
            expense_on("needs", dec!(200), "2025-05-20T10:00:00Z"),
            expense_on("needs", dec!(300), "2025-06-05T10:00:00Z"),
            // Older than the window; must not appear anywhere.
            expense_on("needs", dec!(999), "2024-11-30T10:00:00Z"),
        ];
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

        let trend = monthly_trend(&expenses, today);
        assert_eq!(trend.len(), 6);
        assert_eq!(trend[0].label, "Jan 25");
        assert_eq!(trend[0].amount, dec!(100));
        assert_eq!(trend[4].label, "May 25");
        assert_eq!(trend[4].amount, dec!(200));
        assert_eq!(trend[5].label, "Jun 25");
        assert_eq!(trend[5].amount, dec!(300));
        assert_eq!(trend[1].amount + trend[2].amount + trend[3].amount, dec!(0));
    }

    #[test]
    fn test_top_category_spend_skips_orphans_and_defaults_to_zero() {
        let categories = vec![
            category("needs", dec!(10000), None),
            category("wants", dec!(5000), None),
        ];
        let tree = CategoryTree::new(&categories);

        assert_eq!(top_category_spend(&tree, &[]), dec!(0));

        let expenses = vec![
            expense_on("needs", dec!(300), "2025-06-01T10:00:00Z"),
            expense_on("needs", dec!(200), "2025-06-02T10:00:00Z"),
            expense_on("wants", dec!(400), "2025-06-03T10:00:00Z"),
            expense_on("category::gone", dec!(9000), "2025-06-04T10:00:00Z"),
        ];
        assert_eq!(top_category_spend(&tree, &expenses), dec!(500));
    }

    #[test]
    fn test_percent_used() {
        assert_eq!(percent_used(dec!(50), dec!(200)), Some(dec!(25)));
        assert_eq!(percent_used(dec!(300), dec!(200)), Some(dec!(150)));
        assert_eq!(percent_used(dec!(300), dec!(0)), None);
    }
}
