//! Allocation validation for category writes.
//!
//! Pure accept/reject logic: the validator never persists anything. A main
//! category write is checked against the available income, a subcategory
//! write against the parent's remaining budget. In both cases the value
//! being replaced is backed out first, so editing a category to its own
//! amount always succeeds.

use crate::domain::category_tree::CategoryTree;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::spend_report::total_allocated;
use rust_decimal::Decimal;
use shared::{parse_positive_amount, BudgetCategory, CategoryWriteRequest, Expense};

/// A category write that passed validation, with the amount parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCategoryWrite {
    pub name: String,
    pub amount: Decimal,
    pub parent_id: Option<String>,
}

pub fn validate_category_write(
    request: &CategoryWriteRequest,
    categories: &[BudgetCategory],
    expenses: &[Expense],
    total_available_income: Decimal,
) -> DomainResult<ValidatedCategoryWrite> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidInput(
            "Category name is required".to_string(),
        ));
    }

    let amount = parse_positive_amount(&request.amount)?;

    let tree = CategoryTree::new(categories);

    let prior = match &request.id {
        Some(id) => Some(
            tree.get(id)
                .ok_or_else(|| DomainError::OrphanReference(id.clone()))?,
        ),
        None => None,
    };

    // A category may not be re-parented under itself or its own subtree.
    if let (Some(prior), Some(parent_id)) = (prior, &request.parent_id) {
        if *parent_id == prior.id || tree.descendant_ids(&prior.id).contains(parent_id) {
            return Err(DomainError::InvalidInput(
                "A category cannot be nested under itself".to_string(),
            ));
        }
    }

    match &request.parent_id {
        None => {
            // Main category: the roots' total, with the edited value backed
            // out, must stay within available income.
            let editing_amount = prior
                .filter(|c| c.is_main())
                .map(|c| c.amount)
                .unwrap_or(Decimal::ZERO);
            let new_total = total_allocated(categories) - editing_amount + amount;
            if new_total > total_available_income {
                return Err(DomainError::AllocationExceedsIncome {
                    allocated: new_total,
                    income: total_available_income,
                });
            }
        }
        Some(parent_id) => {
            if tree.get(parent_id).is_none() {
                return Err(DomainError::OrphanReference(parent_id.clone()));
            }

            // Back the subcategory's old amount out of the children term,
            // otherwise an edit always competes with itself.
            let exclude = prior
                .filter(|c| c.parent_id.as_deref() == Some(parent_id.as_str()))
                .map(|c| c.id.as_str());
            let remaining = tree.remaining_budget_excluding(expenses, parent_id, exclude);
            if amount > remaining {
                return Err(DomainError::AllocationExceedsParentBudget {
                    requested: amount,
                    remaining: remaining.max(Decimal::ZERO),
                });
            }
        }
    }

    Ok(ValidatedCategoryWrite {
        name: name.to_string(),
        amount,
        parent_id: request.parent_id.clone(),
    })
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

    fn write(id: Option<&str>, name: &str, amount: &str, parent_id: Option<&str>) -> CategoryWriteRequest {
        CategoryWriteRequest {
            id: id.map(|s| s.to_string()),
            name: name.to_string(),
            amount: amount.to_string(),
            parent_id: parent_id.map(|s| s.to_string()),
        }
    }

    #[test]
    fn test_rejects_blank_name_and_bad_amounts() {
        let err = validate_category_write(&write(None, "  ", "100", None), &[], &[], dec!(1000))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        for amount in ["", "abc", "0", "-50"] {
            let err =
                validate_category_write(&write(None, "Needs", amount, None), &[], &[], dec!(1000))
                    .unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(_)), "amount {:?}", amount);
        }
    }

    #[test]
    fn test_main_category_within_income_is_accepted() {
        let validated =
            validate_category_write(&write(None, "Needs", "10000", None), &[], &[], dec!(20000))
                .unwrap();
        assert_eq!(validated.amount, dec!(10000));
        assert_eq!(validated.parent_id, None);
    }

    #[test]
    fn test_main_category_exceeding_income_is_rejected() {
        let categories = vec![category("needs", dec!(10000), None)];
        let err = validate_category_write(
            &write(None, "Wants", "12000", None),
            &categories,
            &[],
            dec!(20000),
        )
        .unwrap_err();

        match err {
            DomainError::AllocationExceedsIncome { allocated, income } => {
                assert_eq!(allocated, dec!(22000));
                assert_eq!(income, dec!(20000));
            }
            other => panic!("expected AllocationExceedsIncome, got {:?}", other),
        }
    }

    #[test]
    fn test_noop_edit_of_main_category_always_succeeds() {
        // Income fully allocated; re-saving a category with its own amount
        // must not trip the income check.
        let categories = vec![
            category("needs", dec!(10000), None),
            category("wants", dec!(10000), None),
        ];
        let validated = validate_category_write(
            &write(Some("needs"), "Needs", "10000", None),
            &categories,
            &[],
            dec!(20000),
        )
        .unwrap();
        assert_eq!(validated.amount, dec!(10000));
    }

    #[test]
    fn test_zero_income_rejects_any_positive_main_amount() {
        let err = validate_category_write(&write(None, "Needs", "1", None), &[], &[], dec!(0))
            .unwrap_err();
        assert!(matches!(err, DomainError::AllocationExceedsIncome { .. }));
    }

    #[test]
    fn test_subcategory_exceeding_parent_remaining_is_rejected() {
        let categories = vec![category("needs", dec!(10000), None)];
        let err = validate_category_write(
            &write(None, "Groceries", "11000", Some("needs")),
            &categories,
            &[],
            dec!(20000),
        )
        .unwrap_err();

        match err {
            DomainError::AllocationExceedsParentBudget {
                requested,
                remaining,
            } => {
                assert_eq!(requested, dec!(11000));
                assert_eq!(remaining, dec!(10000));
            }
            other => panic!("expected AllocationExceedsParentBudget, got {:?}", other),
        }
    }

    #[test]
    fn test_subcategory_remaining_accounts_for_subtree_spend() {
        let categories = vec![category("needs", dec!(10000), None)];
        let expenses = vec![Expense {
            id: Expense::generate_id(),
            user_id: "user-1".to_string(),
            category_id: "needs".to_string(),
            amount: dec!(4000),
            description: None,
            created_at: "2025-06-01T00:00:00Z".to_string(),
        }];

        // 10,000 allocated, 4,000 already spent -> only 6,000 left to divide.
        let err = validate_category_write(
            &write(None, "Groceries", "7000", Some("needs")),
            &categories,
            &expenses,
            dec!(20000),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::AllocationExceedsParentBudget { .. }));

        assert!(validate_category_write(
            &write(None, "Groceries", "6000", Some("needs")),
            &categories,
            &expenses,
            dec!(20000),
        )
        .is_ok());
    }

    #[test]
    fn test_noop_edit_of_subcategory_backs_out_old_amount() {
        let categories = vec![
            category("needs", dec!(10000), None),
            category("groceries", dec!(10000), Some("needs")),
        ];
        // Without the back-out, remaining would be 0 and this self-edit
        // would always fail.
        let validated = validate_category_write(
            &write(Some("groceries"), "Groceries", "10000", Some("needs")),
            &categories,
            &[],
            dec!(20000),
        )
        .unwrap();
        assert_eq!(validated.amount, dec!(10000));
    }

    #[test]
    fn test_subcategory_with_missing_parent_is_orphan() {
        let err = validate_category_write(
            &write(None, "Groceries", "100", Some("category::gone")),
            &[],
            &[],
            dec!(20000),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::OrphanReference(_)));
    }

    #[test]
    fn test_editing_missing_category_is_orphan() {
        let err = validate_category_write(
            &write(Some("category::gone"), "Needs", "100", None),
            &[],
            &[],
            dec!(20000),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::OrphanReference(_)));
    }

    #[test]
    fn test_category_cannot_be_nested_under_its_own_subtree() {
        let categories = vec![
            category("a", dec!(1000), None),
            category("b", dec!(500), Some("a")),
        ];
        let err = validate_category_write(
            &write(Some("a"), "A", "1000", Some("b")),
            &categories,
            &[],
            dec!(20000),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
