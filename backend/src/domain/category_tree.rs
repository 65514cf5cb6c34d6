//! In-memory category tree built from the flat category list.
//!
//! Categories are stored flat with a nullable `parent_id`; this module
//! builds the adjacency indexes once per snapshot so that traversal is
//! index lookups rather than repeated scans. All traversals carry a
//! visited set: the store does not enforce acyclicity, so a malformed
//! `parent_id` graph must still terminate.

use rust_decimal::Decimal;
use shared::{BudgetCategory, Expense};
use std::collections::{HashMap, HashSet};

pub struct CategoryTree<'a> {
    categories: &'a [BudgetCategory],
    index_by_id: HashMap<&'a str, usize>,
    children_by_parent: HashMap<&'a str, Vec<usize>>,
}

impl<'a> CategoryTree<'a> {
    /// Build the id and parent/child indexes. Input order is preserved
    /// everywhere (the store loads categories ascending by `created_at`).
    pub fn new(categories: &'a [BudgetCategory]) -> Self {
        let mut index_by_id = HashMap::with_capacity(categories.len());
        let mut children_by_parent: HashMap<&str, Vec<usize>> = HashMap::new();

        for (index, category) in categories.iter().enumerate() {
            index_by_id.insert(category.id.as_str(), index);
            if let Some(parent_id) = &category.parent_id {
                children_by_parent
                    .entry(parent_id.as_str())
                    .or_default()
                    .push(index);
            }
        }

        Self {
            categories,
            index_by_id,
            children_by_parent,
        }
    }

    pub fn get(&self, category_id: &str) -> Option<&'a BudgetCategory> {
        self.index_by_id
            .get(category_id)
            .map(|&index| &self.categories[index])
    }

    /// All main categories (no parent), in input order.
    pub fn main_categories(&self) -> Vec<&'a BudgetCategory> {
        self.categories.iter().filter(|c| c.is_main()).collect()
    }

    /// Direct children of `parent_id`, in input order.
    pub fn subcategories(&self, parent_id: &str) -> Vec<&'a BudgetCategory> {
        self.children_by_parent
            .get(parent_id)
            .map(|children| children.iter().map(|&i| &self.categories[i]).collect())
            .unwrap_or_default()
    }

    /// Recursive closure of descendant ids below `root_id`. Terminates on
    /// cyclic graphs; the root itself is not included.
    pub fn descendant_ids(&self, root_id: &str) -> Vec<String> {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(root_id);

        let mut result = Vec::new();
        let mut stack = vec![root_id];
        while let Some(current) = stack.pop() {
            if let Some(children) = self.children_by_parent.get(current) {
                for &child_index in children {
                    let child = &self.categories[child_index];
                    if visited.insert(child.id.as_str()) {
                        result.push(child.id.clone());
                        stack.push(child.id.as_str());
                    }
                }
            }
        }
        result
    }

    /// Sum of expense amounts in `category_id` and all of its descendants.
    /// Expenses pointing at ids outside the subtree (including orphans)
    /// are ignored.
    pub fn spent_in_subtree(&self, expenses: &[Expense], category_id: &str) -> Decimal {
        let mut subtree: HashSet<String> = self.descendant_ids(category_id).into_iter().collect();
        subtree.insert(category_id.to_string());

        expenses
            .iter()
            .filter(|e| subtree.contains(&e.category_id))
            .map(|e| e.amount)
            .sum()
    }

    /// Sum of the direct children's allocated amounts.
    pub fn children_allocated(&self, category_id: &str) -> Decimal {
        self.subcategories(category_id)
            .iter()
            .map(|c| c.amount)
            .sum()
    }

    /// Remaining budget floored at zero, for display:
    /// `max(0, amount - children allocations - subtree spend)`.
    pub fn remaining_budget(&self, expenses: &[Expense], category_id: &str) -> Decimal {
        self.remaining_budget_signed(expenses, category_id)
            .max(Decimal::ZERO)
    }

    /// The true signed remainder; negative signals overspend or
    /// over-allocation. Unknown ids yield zero.
    pub fn remaining_budget_signed(&self, expenses: &[Expense], category_id: &str) -> Decimal {
        self.remaining_budget_excluding(expenses, category_id, None)
    }

    /// Signed remainder with one child's allocation backed out of the
    /// "already allocated to children" term. Used when validating an edit
    /// of that child, so the old value does not count against itself.
    pub fn remaining_budget_excluding(
        &self,
        expenses: &[Expense],
        category_id: &str,
        exclude_child_id: Option<&str>,
    ) -> Decimal {
        let Some(category) = self.get(category_id) else {
            return Decimal::ZERO;
        };

        let children: Decimal = self
            .subcategories(category_id)
            .iter()
            .filter(|c| Some(c.id.as_str()) != exclude_child_id)
            .map(|c| c.amount)
            .sum();

        category.amount - children - self.spent_in_subtree(expenses, category_id)
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

    fn expense(category_id: &str, amount: Decimal) -> Expense {
        Expense {
            id: Expense::generate_id(),
            user_id: "user-1".to_string(),
            category_id: category_id.to_string(),
            amount,
            description: None,
            created_at: "2025-06-01T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_main_categories_preserve_input_order() {
        let categories = vec![
            category("needs", dec!(10000), None),
            category("groceries", dec!(3000), Some("needs")),
            category("wants", dec!(5000), None),
        ];
        let tree = CategoryTree::new(&categories);

        let mains: Vec<&str> = tree
            .main_categories()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(mains, vec!["needs", "wants"]);
    }

    #[test]
    fn test_subcategories_of_parent() {
        let categories = vec![
            category("needs", dec!(10000), None),
            category("groceries", dec!(3000), Some("needs")),
            category("transport", dec!(2000), Some("needs")),
            category("wants", dec!(5000), None),
        ];
        let tree = CategoryTree::new(&categories);

        let subs: Vec<&str> = tree
            .subcategories("needs")
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(subs, vec!["groceries", "transport"]);
        assert!(tree.subcategories("wants").is_empty());
    }

    #[test]
    fn test_descendant_ids_reach_arbitrary_depth() {
        let categories = vec![
            category("a", dec!(100), None),
            category("b", dec!(50), Some("a")),
            category("c", dec!(20), Some("b")),
            category("d", dec!(10), Some("c")),
        ];
        let tree = CategoryTree::new(&categories);

        let mut ids = tree.descendant_ids("a");
        ids.sort();
        assert_eq!(ids, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_descendant_ids_terminate_on_cycle() {
        // A -> B -> A, which the store does not prevent.
        let categories = vec![
            category("a", dec!(100), Some("b")),
            category("b", dec!(50), Some("a")),
        ];
        let tree = CategoryTree::new(&categories);

        let ids = tree.descendant_ids("a");
        assert_eq!(ids, vec!["b".to_string()]);
    }

    #[test]
    fn test_remaining_budget_formula() {
        // amount 10,000, one child of 3,000, expenses totaling 2,000 in the
        // subtree -> remaining 5,000.
        let categories = vec![
            category("needs", dec!(10000), None),
            category("groceries", dec!(3000), Some("needs")),
        ];
        let expenses = vec![
            expense("needs", dec!(1200)),
            expense("groceries", dec!(800)),
        ];
        let tree = CategoryTree::new(&categories);

        assert_eq!(tree.remaining_budget(&expenses, "needs"), dec!(5000));
    }

    #[test]
    fn test_remaining_budget_floors_at_zero_but_signed_goes_negative() {
        let categories = vec![category("wants", dec!(1000), None)];
        let expenses = vec![expense("wants", dec!(1500))];
        let tree = CategoryTree::new(&categories);

        assert_eq!(tree.remaining_budget(&expenses, "wants"), dec!(0));
        assert_eq!(
            tree.remaining_budget_signed(&expenses, "wants"),
            dec!(-500)
        );
    }

    #[test]
    fn test_remaining_budget_excluding_backs_out_child() {
        let categories = vec![
            category("needs", dec!(10000), None),
            category("groceries", dec!(4000), Some("needs")),
        ];
        let tree = CategoryTree::new(&categories);

        assert_eq!(tree.remaining_budget_signed(&[], "needs"), dec!(6000));
        assert_eq!(
            tree.remaining_budget_excluding(&[], "needs", Some("groceries")),
            dec!(10000)
        );
    }

    #[test]
    fn test_spent_in_subtree_skips_orphan_expenses() {
        let categories = vec![category("needs", dec!(10000), None)];
        let expenses = vec![
            expense("needs", dec!(500)),
            expense("category::deleted", dec!(9999)),
        ];
        let tree = CategoryTree::new(&categories);

        assert_eq!(tree.spent_in_subtree(&expenses, "needs"), dec!(500));
    }
}
