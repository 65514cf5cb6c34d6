use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod money;

pub use money::{format_inr, parse_amount, parse_positive_amount, MoneyError};

/// Income record. The most recent row by `created_at` is the user's
/// "current" income; later inserts supersede earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    /// ID in format "income::<uuid>"
    pub id: String,
    pub user_id: String,
    /// Always positive
    pub amount: Decimal,
    pub income_type: IncomeType,
    /// Who the money was borrowed from (borrowed income only)
    pub source: Option<String>,
    /// Repayment due date (borrowed income only), ISO 8601 date
    pub due_date: Option<NaiveDate>,
    /// RFC 3339 timestamp
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeType {
    Salary,
    Borrowed,
}

/// Budget category. Categories form a forest: `parent_id == None` marks a
/// main category, anything else is a subcategory dividing its parent's
/// allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    /// ID in format "category::<uuid>"
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Allocated amount, never negative
    pub amount: Decimal,
    pub parent_id: Option<String>,
    /// RFC 3339 timestamp
    pub created_at: String,
}

impl BudgetCategory {
    pub fn is_main(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Expense logged against a budget category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// ID in format "expense::<uuid>"
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    /// Always positive
    pub amount: Decimal,
    pub description: Option<String>,
    /// RFC 3339 timestamp
    pub created_at: String,
}

/// Per-user profile row: display name, avatar and the borrowed-income
/// budgeting toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub profile_image_url: Option<String>,
    /// Whether borrowed income counts toward the allocation ceiling.
    /// Defaults to true.
    pub include_borrowed_in_budget: bool,
}

impl UserProfile {
    pub fn new(user_id: &str) -> Self {
        Self {
            id: user_id.to_string(),
            name: "User".to_string(),
            profile_image_url: None,
            include_borrowed_in_budget: true,
        }
    }
}

/// Generate a record ID of the form "<kind>::<uuid>".
pub fn generate_record_id(kind: &str) -> String {
    format!("{}::{}", kind, Uuid::new_v4().simple())
}

/// Validate a record ID and return its kind prefix.
pub fn parse_record_id(id: &str) -> Result<&str, RecordIdError> {
    match id.split_once("::") {
        Some((kind, rest)) if !kind.is_empty() && !rest.is_empty() => Ok(kind),
        _ => Err(RecordIdError::InvalidFormat),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordIdError {
    InvalidFormat,
}

impl fmt::Display for RecordIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordIdError::InvalidFormat => write!(f, "Invalid record ID format"),
        }
    }
}

impl std::error::Error for RecordIdError {}

impl Income {
    pub const ID_KIND: &'static str = "income";

    pub fn generate_id() -> String {
        generate_record_id(Self::ID_KIND)
    }
}

impl BudgetCategory {
    pub const ID_KIND: &'static str = "category";

    pub fn generate_id() -> String {
        generate_record_id(Self::ID_KIND)
    }
}

impl Expense {
    pub const ID_KIND: &'static str = "expense";

    pub fn generate_id() -> String {
        generate_record_id(Self::ID_KIND)
    }
}

// ---------------------------------------------------------------------------
// Category DTOs
// ---------------------------------------------------------------------------

/// Request to create or update a budget category. `amount` is the raw form
/// input; it is parsed exactly once, by the allocation validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWriteRequest {
    /// Set when editing an existing category
    pub id: Option<String>,
    pub name: String,
    pub amount: String,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub category: BudgetCategory,
    pub success_message: String,
}

/// What to do with expenses attached to a deleted category (or its
/// subcategories).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExpenseDisposition {
    /// Delete the expenses along with the category
    Cascade,
    /// Move the expenses to another category
    Reparent { target_category_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteCategoryRequest {
    pub expenses: ExpenseDisposition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteCategoryResponse {
    pub deleted_category_ids: Vec<String>,
    pub deleted_expense_count: u32,
    pub reparented_expense_count: u32,
    pub success_message: String,
}

/// One category in the budget screen tree, with its spend figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryView {
    pub category: BudgetCategory,
    /// Spend in this category and all of its descendants
    pub spent: Decimal,
    /// Remaining budget floored at zero for display
    pub remaining: Decimal,
    /// True when the signed remainder went negative
    pub overspent: bool,
    /// Percent of allocation used; None when no budget is set
    pub percent_used: Option<Decimal>,
    pub subcategories: Vec<CategoryView>,
}

/// Income figures every allocation check runs against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub earned_income: Decimal,
    pub borrowed_income: Decimal,
    pub include_borrowed_in_budget: bool,
    pub total_available_income: Decimal,
    /// Sum of main category allocations only
    pub total_allocated: Decimal,
    /// Signed remainder; negative means allocations exceed income
    pub unallocated: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryListResponse {
    pub main_categories: Vec<CategoryView>,
    pub summary: AllocationSummary,
}

// ---------------------------------------------------------------------------
// Income DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIncomeRequest {
    /// Raw form input
    pub amount: String,
    pub income_type: IncomeType,
    pub source: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeResponse {
    pub income: Income,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSummaryResponse {
    pub earned_income: Decimal,
    pub borrowed_income: Decimal,
    pub include_borrowed_in_budget: bool,
    pub total_available_income: Decimal,
}

// ---------------------------------------------------------------------------
// Repayment DTOs (borrowed income)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentStatus {
    /// Past the due date
    Overdue,
    /// Due within 7 days
    Urgent,
    /// Due within 30 days
    Upcoming,
    /// Due later
    Future,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingRepayment {
    pub amount: Decimal,
    pub source: Option<String>,
    pub due_date: NaiveDate,
    /// Negative once overdue
    pub days_until_due: i64,
    pub status: RepaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingRepaymentsResponse {
    pub repayments: Vec<UpcomingRepayment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRepaymentRequest {
    /// Raw form input
    pub amount: String,
    pub source: String,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Expense DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    pub category_id: String,
    /// Raw form input
    pub amount: String,
    pub description: Option<String>,
}

/// Partial expense update; omitted fields are left unchanged. Changing
/// `category_id` moves the expense to another category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    pub category_id: Option<String>,
    pub amount: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseResponse {
    pub expense: Expense,
    pub success_message: String,
}

/// Expense plus its resolved category name. `category_name` is None for
/// orphaned expenses whose category was deleted out from under them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseView {
    pub expense: Expense,
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<ExpenseView>,
}

// ---------------------------------------------------------------------------
// Report DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySpend {
    /// e.g. "Mar 25"
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category_id: String,
    pub name: String,
    pub spent: Decimal,
    pub allocated: Decimal,
    /// None when no budget is set for the category
    pub percent_used: Option<Decimal>,
    pub over_budget: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportsResponse {
    pub total_spent: Decimal,
    pub today_spent: Decimal,
    pub week_spent: Decimal,
    pub month_spent: Decimal,
    pub top_category_spent: Decimal,
    /// Trailing six calendar months, oldest first
    pub monthly_trend: Vec<MonthlySpend>,
    /// Main categories sorted by percent used, highest first
    pub breakdown: Vec<CategoryBreakdown>,
}

// ---------------------------------------------------------------------------
// Profile DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub profile_image_url: Option<String>,
    pub include_borrowed_in_budget: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub url: String,
    pub success_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_generate_and_parse_record_id() {
        let id = Expense::generate_id();
        assert!(id.starts_with("expense::"));
        assert_eq!(parse_record_id(&id).unwrap(), "expense");

        let id = BudgetCategory::generate_id();
        assert_eq!(parse_record_id(&id).unwrap(), "category");
    }

    #[test]
    fn test_parse_record_id_rejects_malformed() {
        assert_eq!(parse_record_id("no-separator"), Err(RecordIdError::InvalidFormat));
        assert_eq!(parse_record_id("::abc"), Err(RecordIdError::InvalidFormat));
        assert_eq!(parse_record_id("income::"), Err(RecordIdError::InvalidFormat));
    }

    #[test]
    fn test_category_is_main() {
        let mut category = BudgetCategory {
            id: BudgetCategory::generate_id(),
            user_id: "user-1".to_string(),
            name: "Needs".to_string(),
            amount: dec!(10000),
            parent_id: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };
        assert!(category.is_main());

        category.parent_id = Some(BudgetCategory::generate_id());
        assert!(!category.is_main());
    }

    #[test]
    fn test_income_type_serde_format() {
        let json = serde_json::to_string(&IncomeType::Borrowed).unwrap();
        assert_eq!(json, "\"borrowed\"");
        let parsed: IncomeType = serde_json::from_str("\"salary\"").unwrap();
        assert_eq!(parsed, IncomeType::Salary);
    }

    #[test]
    fn test_expense_disposition_serde_format() {
        let cascade: ExpenseDisposition = serde_json::from_str(r#"{"mode":"cascade"}"#).unwrap();
        assert_eq!(cascade, ExpenseDisposition::Cascade);

        let reparent: ExpenseDisposition =
            serde_json::from_str(r#"{"mode":"reparent","target_category_id":"category::x"}"#)
                .unwrap();
        assert_eq!(
            reparent,
            ExpenseDisposition::Reparent {
                target_category_id: "category::x".to_string()
            }
        );
    }

    #[test]
    fn test_default_profile_includes_borrowed() {
        let profile = UserProfile::new("user-1");
        assert!(profile.include_borrowed_in_budget);
        assert_eq!(profile.name, "User");
    }
}
