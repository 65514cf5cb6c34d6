//! Blob storage for uploaded profile images.
//!
//! The trait hides where bytes land; the filesystem implementation writes
//! under a media root that the HTTP layer serves statically. An upload to
//! an existing key overwrites it, which is exactly what re-uploading a
//! profile picture should do.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous content.
    async fn upload(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// The URL clients fetch the blob from.
    fn public_url(&self, key: &str) -> String;
}

/// Filesystem-backed blob store rooted at a media directory.
pub struct FsBlobStore {
    root: PathBuf,
    base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            base_url: "/media".to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn upload(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create blob directory {:?}", parent))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write blob {:?}", path))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}
