//! # REST API for Income and Repayments
//!
//! Recording income, the income summary, and borrowed-income repayment
//! tracking.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Local;
use tracing::{error, info};

use crate::io::rest::error_status;
use crate::AppState;
use shared::{CreateIncomeRequest, LogRepaymentRequest};

/// Record a new income row
pub async fn create_income(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CreateIncomeRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/incomes - request: {:?}", user_id, request);

    match state.income_service.record(&user_id, &request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to record income: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// List all income rows, most recent first
pub async fn list_incomes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/incomes", user_id);

    match state.income_service.list(&user_id).await {
        Ok(incomes) => (StatusCode::OK, Json(incomes)).into_response(),
        Err(e) => {
            error!("Failed to list incomes: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// The earned/borrowed income summary the budget screen shows
pub async fn income_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/incomes/summary", user_id);

    match state.income_service.summary(&user_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to build income summary: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Borrowed-income repayments with due dates and urgency
pub async fn upcoming_repayments(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/repayments", user_id);

    let today = Local::now().date_naive();
    match state.income_service.upcoming_repayments(&user_id, today).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list repayments: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Log a repayment against the auto-created Repayments category
pub async fn log_repayment(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<LogRepaymentRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/repayments - request: {:?}", user_id, request);

    match state.income_service.log_repayment(&user_id, &request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to log repayment: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}
