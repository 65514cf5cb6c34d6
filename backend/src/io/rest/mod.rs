//! # REST API modules
//!
//! One module per resource, all handlers taking `State<AppState>` plus a
//! `user_id` path segment. Domain errors map onto status codes in one
//! place so every endpoint reports the same way.

pub mod category_apis;
pub mod expense_apis;
pub mod income_apis;
pub mod profile_apis;
pub mod report_apis;

use crate::domain::DomainError;
use axum::http::StatusCode;

/// Status code for a domain error: validation failures are the caller's
/// to fix, missing references are 404, store trouble is a 500.
pub(crate) fn error_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::InvalidInput(_)
        | DomainError::AllocationExceedsIncome { .. }
        | DomainError::AllocationExceedsParentBudget { .. } => StatusCode::BAD_REQUEST,
        DomainError::OrphanReference(_) => StatusCode::NOT_FOUND,
        DomainError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
