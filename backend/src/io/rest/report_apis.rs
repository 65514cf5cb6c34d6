//! # REST API for Reports
//!
//! The summary cards, monthly trend and budget-vs-spending breakdown.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Local;
use tracing::{error, info};

use crate::io::rest::error_status;
use crate::AppState;

/// Build the full reports payload as of today
pub async fn get_reports(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/reports", user_id);

    let today = Local::now().date_naive();
    match state.report_service.reports(&user_id, today).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to build reports: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}
