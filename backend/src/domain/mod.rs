//! Domain layer: the budgeting rules and the services that orchestrate
//! them over the storage traits.
//!
//! The pure modules (`category_tree`, `allocation`, `income`,
//! `spend_report`) take snapshots as slices and never touch a store;
//! the `*_service` modules load the snapshot, run them, and persist the
//! outcome.

pub mod allocation;
pub mod category_service;
pub mod category_tree;
pub mod errors;
pub mod expense_service;
pub mod income;
pub mod income_service;
pub mod profile_service;
pub mod report_service;
pub mod spend_report;

pub use category_service::CategoryService;
pub use errors::{DomainError, DomainResult};
pub use expense_service::ExpenseService;
pub use income_service::IncomeService;
pub use profile_service::ProfileService;
pub use report_service::ReportService;
