use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::ImageData;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Image file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot build a file URL for {0}")]
    InvalidPath(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
}

/// Uploader reply in the shape the image tool expects:
/// `{"success": 1, "file": {"url": "..."}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: u8,
    pub file: UploadedFile,
}

impl UploadResponse {
    pub fn succeeded(url: impl Into<String>) -> Self {
        Self {
            success: 1,
            file: UploadedFile { url: url.into() },
        }
    }
}

/// Turns a raw image file into a URL an image block can reference
pub trait ImageUploader {
    fn upload(&self, file: &Path) -> Result<UploadResponse, UploadError>;
}

/// Resolves images to local `file://` URLs; nothing leaves the machine
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileUploader;

impl ImageUploader for LocalFileUploader {
    fn upload(&self, file: &Path) -> Result<UploadResponse, UploadError> {
        if !file.exists() {
            return Err(UploadError::NotFound(file.to_path_buf()));
        }
        let absolute = file.canonicalize()?;
        let url = url::Url::from_file_path(&absolute)
            .map_err(|_| UploadError::InvalidPath(absolute.clone()))?;
        Ok(UploadResponse::succeeded(url.to_string()))
    }
}

impl ImageData {
    /// Build an image payload from an uploader reply
    pub fn from_upload(response: &UploadResponse, caption: impl Into<String>) -> Self {
        Self::new(response.file.url.clone()).with_caption(caption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_upload_returns_file_url() {
        let dir = TempDir::new().unwrap();
        let image = dir.path().join("photo.png");
        std::fs::write(&image, b"\x89PNG").unwrap();

        let response = LocalFileUploader.upload(&image).unwrap();

        assert_eq!(response.success, 1);
        assert!(response.file.url.starts_with("file://"));
        assert!(response.file.url.ends_with("/photo.png"));
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let result = LocalFileUploader.upload(Path::new("/this/path/does/not/exist.png"));

        assert!(matches!(result, Err(UploadError::NotFound(_))));
    }

    #[test]
    fn test_response_wire_format() {
        let json = serde_json::to_string(&UploadResponse::succeeded("file:///a.png")).unwrap();

        assert_eq!(json, r#"{"success":1,"file":{"url":"file:///a.png"}}"#);
    }

    #[test]
    fn test_image_data_from_upload() {
        let data = ImageData::from_upload(&UploadResponse::succeeded("file:///a.png"), "A cat");

        assert_eq!(data.url, "file:///a.png");
        assert_eq!(data.caption, "A cat");
        assert_eq!(data.width, None);
    }
}
