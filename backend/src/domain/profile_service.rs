//! Profile orchestration: display name, the borrowed-income toggle and
//! avatar uploads.

use crate::domain::errors::{DomainError, DomainResult};
use crate::storage::{BlobStore, ProfileStore};
use shared::{ProfileResponse, UpdateProfileRequest, UploadImageResponse, UserProfile};
use std::sync::Arc;
use tracing::info;

pub struct ProfileService {
    profiles: Arc<dyn ProfileStore>,
    blobs: Arc<dyn BlobStore>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { profiles, blobs }
    }

    /// Fetch the profile, materializing the default row on first touch.
    pub async fn get_or_create(&self, user_id: &str) -> DomainResult<UserProfile> {
        if let Some(profile) = self.profiles.get_profile(user_id).await? {
            return Ok(profile);
        }
        let profile = UserProfile::new(user_id);
        self.profiles.upsert_profile(&profile).await?;
        info!("Created default profile for user {}", user_id);
        Ok(profile)
    }

    /// Partial profile update; omitted fields keep their stored values.
    pub async fn update(
        &self,
        user_id: &str,
        request: &UpdateProfileRequest,
    ) -> DomainResult<ProfileResponse> {
        let mut profile = self.get_or_create(user_id).await?;

        if let Some(name) = &request.name {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(DomainError::InvalidInput("Name is required".to_string()));
            }
            profile.name = trimmed.to_string();
        }
        if let Some(url) = &request.profile_image_url {
            profile.profile_image_url = Some(url.clone());
        }
        if let Some(include_borrowed) = request.include_borrowed_in_budget {
            profile.include_borrowed_in_budget = include_borrowed;
        }

        self.profiles.upsert_profile(&profile).await?;
        info!("Updated profile for user {}", user_id);

        Ok(ProfileResponse {
            profile,
            success_message: "Profile updated".to_string(),
        })
    }

    /// Store an uploaded avatar and point the profile at its URL. Each
    /// user has one avatar key, so re-uploads replace the old image.
    pub async fn upload_image(
        &self,
        user_id: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> DomainResult<UploadImageResponse> {
        if bytes.is_empty() {
            return Err(DomainError::InvalidInput("Empty image upload".to_string()));
        }
        let extension = match content_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            other => {
                return Err(DomainError::InvalidInput(format!(
                    "Unsupported image type: {}",
                    other
                )))
            }
        };

        let key = format!("avatars/{}.{}", sanitize_key_segment(user_id), extension);
        self.blobs.upload(&key, bytes).await?;
        let url = self.blobs.public_url(&key);

        let mut profile = self.get_or_create(user_id).await?;
        profile.profile_image_url = Some(url.clone());
        self.profiles.upsert_profile(&profile).await?;
        info!("Uploaded profile image for user {}", user_id);

        Ok(UploadImageResponse {
            url,
            success_message: "Profile picture updated".to_string(),
        })
    }
}

/// Keep blob keys flat: anything outside [A-Za-z0-9_-] becomes '_' so a
/// crafted user id cannot traverse out of the avatars directory.
fn sanitize_key_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
