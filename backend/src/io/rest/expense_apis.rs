//! # REST API for Expenses
//!
//! Logging, editing, listing and deleting expenses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::io::rest::error_status;
use crate::AppState;
use shared::{CreateExpenseRequest, UpdateExpenseRequest};

/// Log a new expense
pub async fn create_expense(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/expenses - request: {:?}", user_id, request);

    match state.expense_service.create(&user_id, &request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create expense: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// List all expenses, most recent first
pub async fn list_expenses(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/expenses", user_id);

    match state.expense_service.list(&user_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list expenses: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// List the expenses of one category and its subcategories
pub async fn list_category_expenses(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/categories/{}/expenses", user_id, category_id);

    match state
        .expense_service
        .list_for_category(&user_id, &category_id)
        .await
    {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list category expenses: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Update an expense (amount, description, or move between categories)
pub async fn update_expense(
    State(state): State<AppState>,
    Path((user_id, expense_id)): Path<(String, String)>,
    Json(request): Json<UpdateExpenseRequest>,
) -> impl IntoResponse {
    info!(
        "PUT /api/users/{}/expenses/{} - request: {:?}",
        user_id, expense_id, request
    );

    match state
        .expense_service
        .update(&user_id, &expense_id, &request)
        .await
    {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to update expense: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Delete an expense
pub async fn delete_expense(
    State(state): State<AppState>,
    Path((user_id, expense_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/users/{}/expenses/{}", user_id, expense_id);

    match state.expense_service.delete(&user_id, &expense_id).await {
        Ok(_) => (StatusCode::NO_CONTENT, "").into_response(),
        Err(e) => {
            error!("Failed to delete expense: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}
