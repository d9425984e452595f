//! Storage for portfolio images posted as data URLs.

use crate::models::{ServiceError, UploadImageRequest, UploadImageResponse};
use base64::Engine;
use std::path::PathBuf;

/// Sub-directory of the upload root holding portfolio images.
pub const PORTFOLIO_PREFIX: &str = "portfolio";

/// Mount point of the upload root in the HTTP server.
pub const UPLOADS_ROUTE: &str = "/uploads";

pub struct UploadService {
    root: PathBuf,
    public_base_url: String,
}

impl UploadService {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub async fn store_image(&self, request: &UploadImageRequest) -> Result<UploadImageResponse, ServiceError> {
        let payload = strip_data_url_prefix(&request.image);
        if payload.trim().is_empty() {
            return Err(ServiceError::ValidationError("Image data is required".to_string()));
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| ServiceError::ValidationError(format!("Invalid base64 image data: {}", e)))?;

        if !is_image_data(&bytes) {
            return Err(ServiceError::ValidationError("Uploaded data is not an image".to_string()));
        }

        let extension = image_extension(request.filename.as_deref().unwrap_or("image.jpg"));
        let relative = format!("{}/{}.{}", PORTFOLIO_PREFIX, uuid::Uuid::new_v4(), extension);

        let target = self.root.join(&relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::InternalError(format!("Failed to create upload dir: {}", e)))?;
        }
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|e| ServiceError::InternalError(format!("Failed to write image: {}", e)))?;

        tracing::info!("Stored portfolio image {} ({} bytes)", relative, bytes.len());

        Ok(UploadImageResponse {
            url: format!("{}{}/{}", self.public_base_url, UPLOADS_ROUTE, relative),
            filename: relative,
        })
    }
}

/// Accepts both `data:image/png;base64,XXXX` and bare base64.
fn strip_data_url_prefix(image: &str) -> &str {
    if image.starts_with("data:") {
        match image.split_once(',') {
            Some((_, payload)) => payload,
            None => "",
        }
    } else {
        image
    }
}

/// Extension from the client filename, restricted to the formats we serve; jpg otherwise.
fn image_extension(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" => "jpg",
        "jpeg" => "jpeg",
        "png" => "png",
        "gif" => "gif",
        "webp" => "webp",
        _ => "jpg",
    }
}

fn is_image_data(data: &[u8]) -> bool {
    if data.len() < 4 {
        return false;
    }

    data.starts_with(&[0xFF, 0xD8, 0xFF]) || // JPEG
        data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) || // PNG
        data.starts_with(b"GIF") ||
        (data.len() >= 12 && &data[8..12] == b"WEBP")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn strips_data_url_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/png;base64,QUJD"), "QUJD");
        assert_eq!(strip_data_url_prefix("QUJD"), "QUJD");
        assert_eq!(strip_data_url_prefix("data:broken"), "");
    }

    #[test]
    fn extension_falls_back_to_jpg() {
        assert_eq!(image_extension("shot.PNG"), "png");
        assert_eq!(image_extension("photo.webp"), "webp");
        assert_eq!(image_extension("archive.tar.gz"), "jpg");
        assert_eq!(image_extension("noext"), "jpg");
    }

    #[tokio::test]
    async fn stores_image_under_portfolio_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let service = UploadService::new(dir.path(), "http://localhost:5000");
        let encoded = base64::engine::general_purpose::STANDARD.encode(PNG_HEADER);

        let response = service
            .store_image(&UploadImageRequest {
                image: format!("data:image/png;base64,{}", encoded),
                filename: Some("logo.png".to_string()),
            })
            .await
            .unwrap();

        assert!(response.filename.starts_with("portfolio/"));
        assert!(response.filename.ends_with(".png"));
        assert_eq!(
            response.url,
            format!("http://localhost:5000/uploads/{}", response.filename)
        );
        let written = std::fs::read(dir.path().join(&response.filename)).unwrap();
        assert_eq!(written, PNG_HEADER);
    }

    #[tokio::test]
    async fn rejects_non_image_payload() {
        let dir = tempfile::tempdir().unwrap();
        let service = UploadService::new(dir.path(), "http://localhost:5000");
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"plain text file");

        let err = service
            .store_image(&UploadImageRequest {
                image: encoded,
                filename: Some("notes.txt".to_string()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }
}
