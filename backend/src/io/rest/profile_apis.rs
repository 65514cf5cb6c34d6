//! # REST API for User Profiles
//!
//! Profile fetch/update and avatar upload.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::io::rest::error_status;
use crate::AppState;
use shared::UpdateProfileRequest;

/// Fetch the profile, creating the default row on first access
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/users/{}/profile", user_id);

    match state.profile_service.get_or_create(&user_id).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => {
            error!("Failed to get profile: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Update profile fields (name, avatar URL, borrowed-income toggle)
pub async fn update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    info!("PUT /api/users/{}/profile - request: {:?}", user_id, request);

    match state.profile_service.update(&user_id, &request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to update profile: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}

/// Upload a profile picture; the raw body is the image, its format comes
/// from the Content-Type header
pub async fn upload_profile_image(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    info!("POST /api/users/{}/profile/image ({} bytes)", user_id, body.len());

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    match state
        .profile_service
        .upload_image(&user_id, &content_type, &body)
        .await
    {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to upload profile image: {}", e);
            (error_status(&e), e.to_string()).into_response()
        }
    }
}
