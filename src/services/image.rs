use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use crate::config::MediaConfig;

/// Fallback icon served when a user has never uploaded one.
pub const PLACEHOLDER_ICON: &str = "profileIcon.png";

const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpeg", "jpg"];

pub struct ImageService {
    media_path: PathBuf,
}

impl ImageService {
    #[must_use]
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            media_path: PathBuf::from(&config.media_path),
        }
    }

    /// Store an uploaded profile icon under a fresh uuid filename and return
    /// the stored name. Rejects anything that is not png/jpeg/jpg.
    pub async fn save_profile_icon(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            anyhow::bail!("Unsupported image type: expected png, jpeg, or jpg");
        }

        if !self.media_path.exists() {
            fs::create_dir_all(&self.media_path).await?;
        }

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let file_path = self.media_path.join(&filename);

        fs::write(&file_path, bytes)
            .await
            .with_context(|| format!("Failed to write image to {}", file_path.display()))?;

        info!(path = %file_path.display(), "Stored profile icon");

        Ok(filename)
    }

    /// Absolute URL for a stored icon, falling back to the placeholder.
    #[must_use]
    pub fn icon_url(base_url: &str, stored: Option<&str>) -> String {
        let name = stored.unwrap_or(PLACEHOLDER_ICON);
        format!("{}/media/{}", base_url.trim_end_matches('/'), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_url_uses_placeholder_when_unset() {
        assert_eq!(
            ImageService::icon_url("http://localhost:8095", None),
            "http://localhost:8095/media/profileIcon.png"
        );
    }

    #[test]
    fn icon_url_strips_trailing_slash() {
        assert_eq!(
            ImageService::icon_url("http://localhost:8095/", Some("abc.png")),
            "http://localhost:8095/media/abc.png"
        );
    }

    #[tokio::test]
    async fn rejects_disallowed_extension() {
        let svc = ImageService::new(&MediaConfig {
            media_path: std::env::temp_dir()
                .join("agritrack-test-media")
                .to_string_lossy()
                .into_owned(),
        });

        assert!(svc.save_profile_icon("evil.svg", b"<svg/>").await.is_err());
        assert!(svc.save_profile_icon("noext", b"x").await.is_err());
    }
}
