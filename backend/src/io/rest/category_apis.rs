//! # REST API for Budget Categories
//!
//! The budget screen tree, category create/update/delete and the
//! recommended 50/30/20 bootstrap.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::io::rest::error_status;
use crate::AppState;
use shared::{CategoryWriteRequest, DeleteCategoryRequest};

/// List the category tree with spending figures and the allocation summary
pub async fn list_categories(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/categories", user_id);

    match state.category_service.list(&user_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list categories: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Create a category, or update one when the request carries an id
pub async fn write_category(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<CategoryWriteRequest>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/categories - request: {:?}", user_id, request);

    let created = request.id.is_none();
    match state.category_service.write(&user_id, &request).await {
        Ok(response) => {
            let status = if created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to write category: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Delete a category, its direct children, and handle their expenses
pub async fn delete_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(String, String)>,
    Json(request): Json<DeleteCategoryRequest>,
) -> impl IntoResponse {
    info!(
        "DELETE /api/users/{}/categories/{} - request: {:?}",
        user_id, category_id, request
    );

    match state
        .category_service
        .delete(&user_id, &category_id, &request)
        .await
    {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to delete category: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Bootstrap the recommended 50/30/20 categories
pub async fn create_recommended_categories(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/users/{}/categories/recommended", user_id);

    match state.category_service.create_recommended(&user_id).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create recommended categories: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}
