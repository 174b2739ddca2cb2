//! Image upload service implementation
//!
//! Uploaded images are validated against the configured extension
//! allow-list and size cap, re-encoded in a bounded full rendition plus a
//! thumbnail, and written under the upload directory with UUID names.

use std::path::{Path, PathBuf};
use image::imageops::FilterType;
use tracing::{debug, info};
use uuid::Uuid;
use crate::config::UploadConfig;
use crate::models::response::UploadResponse;
use crate::utils::errors::{Result, VentyTimeError};
use crate::utils::helpers::file_extension;

/// Image service for validating, resizing and storing uploads
#[derive(Debug, Clone)]
pub struct ImageService {
    config: UploadConfig,
}

impl ImageService {
    /// Create a new ImageService instance
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    /// Validate file name and size; returns the normalized extension
    pub fn validate_upload(&self, filename: &str, size_bytes: usize) -> Result<String> {
        let extension = file_extension(filename).ok_or_else(|| {
            VentyTimeError::InvalidInput("File has no extension".to_string())
        })?;

        if !self.config.allowed_extensions.iter().any(|e| e == &extension) {
            return Err(VentyTimeError::InvalidInput(format!(
                "File type .{} is not allowed",
                extension
            )));
        }

        if size_bytes == 0 {
            return Err(VentyTimeError::InvalidInput("File is empty".to_string()));
        }
        if size_bytes > self.config.max_size_bytes {
            return Err(VentyTimeError::InvalidInput(format!(
                "File exceeds the maximum size of {} bytes",
                self.config.max_size_bytes
            )));
        }

        Ok(extension)
    }

    /// Store an uploaded image and return the full and thumbnail URLs
    pub async fn store(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadResponse> {
        let extension = self.validate_upload(filename, bytes.len())?;
        debug!(filename = filename, size = bytes.len(), "Storing uploaded image");

        tokio::fs::create_dir_all(&self.config.directory).await?;

        let base_name = Uuid::new_v4().to_string();
        let full_name = format!("{}.{}", base_name, extension);
        let thumb_name = format!("{}_thumb.{}", base_name, extension);
        let full_path = Path::new(&self.config.directory).join(&full_name);
        let thumb_path = Path::new(&self.config.directory).join(&thumb_name);

        let max_dimension = self.config.max_dimension;
        let thumbnail_dimension = self.config.thumbnail_dimension;

        // Decoding and re-encoding are CPU bound; keep them off the runtime
        tokio::task::spawn_blocking(move || -> Result<()> {
            let img = image::load_from_memory(&bytes)
                .map_err(|e| VentyTimeError::Image(format!("Could not decode image: {}", e)))?;

            let full = if img.width() > max_dimension || img.height() > max_dimension {
                img.resize(max_dimension, max_dimension, FilterType::Lanczos3)
            } else {
                img.clone()
            };
            full.save(&full_path)
                .map_err(|e| VentyTimeError::Image(format!("Could not write image: {}", e)))?;

            let thumb = img.thumbnail(thumbnail_dimension, thumbnail_dimension);
            thumb
                .save(&thumb_path)
                .map_err(|e| VentyTimeError::Image(format!("Could not write thumbnail: {}", e)))?;

            Ok(())
        })
        .await
        .map_err(|e| VentyTimeError::ServiceUnavailable(format!("Image worker failed: {}", e)))??;

        info!(file = %full_name, "Image stored");

        Ok(UploadResponse {
            url: format!("/uploads/{}", full_name),
            thumbnail_url: format!("/uploads/{}", thumb_name),
        })
    }

    /// Filesystem directory served under `/uploads`
    pub fn directory(&self) -> PathBuf {
        PathBuf::from(&self.config.directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service(dir: &str) -> ImageService {
        ImageService::new(UploadConfig {
            directory: dir.to_string(),
            max_size_bytes: 1024 * 1024,
            allowed_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            max_dimension: 64,
            thumbnail_dimension: 16,
        })
    }

    #[test]
    fn test_validate_rejects_disallowed_extension() {
        let service = test_service("uploads");
        assert!(service.validate_upload("malware.exe", 100).is_err());
        assert!(service.validate_upload("noextension", 100).is_err());
    }

    #[test]
    fn test_validate_accepts_allowed_extension_any_case() {
        let service = test_service("uploads");
        assert_eq!(service.validate_upload("photo.PNG", 100).unwrap(), "png");
        assert_eq!(service.validate_upload("photo.jpeg", 100).unwrap(), "jpeg");
    }

    #[test]
    fn test_validate_rejects_oversized_file() {
        let service = test_service("uploads");
        assert!(service.validate_upload("photo.png", 2 * 1024 * 1024).is_err());
        assert!(service.validate_upload("photo.png", 0).is_err());
    }

    #[tokio::test]
    async fn test_store_writes_full_and_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let service = test_service(dir.path().to_str().unwrap());

        // 32x32 solid color PNG
        let mut bytes = Vec::new();
        let img = image::RgbImage::from_pixel(32, 32, image::Rgb([120, 30, 200]));
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let response = service.store("pixel.png", bytes).await.unwrap();
        assert!(response.url.starts_with("/uploads/"));
        assert!(response.thumbnail_url.contains("_thumb"));

        let stored: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_store_rejects_non_image_payload() {
        let dir = tempfile::tempdir().unwrap();
        let service = test_service(dir.path().to_str().unwrap());

        let result = service.store("fake.png", b"this is not a png".to_vec()).await;
        assert!(result.is_err());
    }
}
