//! Headless portfolio project editor: field edits, image slots, bounded gallery.

use std::collections::HashMap;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use super::api::{ApiError, ImageUploader, PortfolioStore};
use crate::models::{PortfolioProject, MAX_GALLERY_IMAGES, MAX_TITLE_CHARS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Main,
    Preview,
    Carousel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadTarget {
    Slot(ImageSlot),
    Gallery,
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Gallery can hold at most {} images", MAX_GALLERY_IMAGES)]
    GalleryFull,
    #[error("Gallery has no image at position {index} (length {len})")]
    GalleryIndexOutOfRange { index: usize, len: usize },
    #[error("An image upload is still in progress")]
    UploadInProgress,
    #[error("Project title is required")]
    TitleRequired,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A fully buffered image picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self { filename, bytes })
    }

    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}

/// An upload that has been started and must be handed back to `finish_upload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub target: UploadTarget,
    pub filename: String,
    pub data_url: String,
}

/// Holds an in-flight count until the upload is settled or abandoned.
struct Reservation<'a> {
    editor: &'a mut PortfolioEditor,
    target: UploadTarget,
    settled: bool,
}

impl Reservation<'_> {
    fn settle(mut self, pending: PendingUpload, result: Result<String, ApiError>) -> Result<(), EditorError> {
        self.settled = true;
        self.editor.finish_upload(pending, result)
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Upload to {:?} dropped before completion", self.target);
            self.editor.release(self.target);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PortfolioEditor {
    project: PortfolioProject,
    in_flight: HashMap<UploadTarget, usize>,
}

impl PortfolioEditor {
    pub fn new(project: PortfolioProject) -> Self {
        Self {
            project,
            in_flight: HashMap::new(),
        }
    }

    pub fn project(&self) -> &PortfolioProject {
        &self.project
    }

    pub fn into_project(self) -> PortfolioProject {
        self.project
    }

    pub fn set_title(&mut self, title: &str) {
        self.project.title = title.chars().take(MAX_TITLE_CHARS).collect();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.project.description = description.into();
    }

    pub fn set_website_url(&mut self, url: impl Into<String>) {
        self.project.website_url = url.into();
    }

    pub fn set_active(&mut self, active: bool) {
        self.project.is_active = active;
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight.values().any(|count| *count > 0)
    }

    pub fn is_uploading_to(&self, target: UploadTarget) -> bool {
        self.in_flight.get(&target).copied().unwrap_or(0) > 0
    }

    pub fn can_save(&self) -> bool {
        !self.is_uploading() && !self.project.title.trim().is_empty()
    }

    fn gallery_reserved(&self) -> usize {
        self.project.gallery_images.len() + self.in_flight.get(&UploadTarget::Gallery).copied().unwrap_or(0)
    }

    fn slot_mut(&mut self, slot: ImageSlot) -> &mut Option<String> {
        match slot {
            ImageSlot::Main => &mut self.project.image_url,
            ImageSlot::Preview => &mut self.project.preview_image_url,
            ImageSlot::Carousel => &mut self.project.carousel_image_url,
        }
    }

    fn release(&mut self, target: UploadTarget) {
        if let Some(count) = self.in_flight.get_mut(&target) {
            *count = count.saturating_sub(1);
        }
    }

    pub fn begin_upload(&mut self, target: UploadTarget, file: &ImageFile) -> Result<PendingUpload, EditorError> {
        if target == UploadTarget::Gallery && self.gallery_reserved() >= MAX_GALLERY_IMAGES {
            return Err(EditorError::GalleryFull);
        }

        *self.in_flight.entry(target).or_insert(0) += 1;

        Ok(PendingUpload {
            target,
            filename: file.filename.clone(),
            data_url: file.to_data_url(),
        })
    }

    /// Applies the outcome of an upload. On error the project is left untouched.
    pub fn finish_upload(
        &mut self,
        pending: PendingUpload,
        result: Result<String, ApiError>,
    ) -> Result<(), EditorError> {
        self.release(pending.target);

        let url = result.map_err(|e| {
            tracing::error!("Upload of {} failed: {}", pending.filename, e);
            EditorError::Api(e)
        })?;

        match pending.target {
            UploadTarget::Slot(slot) => *self.slot_mut(slot) = Some(url),
            UploadTarget::Gallery => {
                if self.project.gallery_images.len() >= MAX_GALLERY_IMAGES {
                    return Err(EditorError::GalleryFull);
                }
                self.project.gallery_images.push(url);
            }
        }
        Ok(())
    }

    /// Drops a started upload without touching the project.
    pub fn cancel_upload(&mut self, pending: PendingUpload) {
        tracing::warn!("Upload of {} abandoned", pending.filename);
        self.release(pending.target);
    }

    /// Begins, sends and finishes an upload. Dropping the future mid-request
    /// releases the reservation.
    pub async fn upload(
        &mut self,
        target: UploadTarget,
        file: &ImageFile,
        uploader: &dyn ImageUploader,
    ) -> Result<(), EditorError> {
        let pending = self.begin_upload(target, file)?;
        let reservation = Reservation {
            editor: self,
            target,
            settled: false,
        };
        let result = uploader.upload_image(&pending.data_url, &pending.filename).await;
        reservation.settle(pending, result)
    }

    /// Appends a pasted URL. Returns `Ok(false)` for blank input.
    pub fn add_gallery_url(&mut self, raw: &str) -> Result<bool, EditorError> {
        let url = raw.trim();
        if url.is_empty() {
            return Ok(false);
        }
        if self.gallery_reserved() >= MAX_GALLERY_IMAGES {
            return Err(EditorError::GalleryFull);
        }
        self.project.gallery_images.push(url.to_string());
        Ok(true)
    }

    pub fn remove_gallery_image(&mut self, index: usize) -> Result<String, EditorError> {
        let len = self.project.gallery_images.len();
        if index >= len {
            return Err(EditorError::GalleryIndexOutOfRange { index, len });
        }
        Ok(self.project.gallery_images.remove(index))
    }

    pub fn move_gallery_image(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        let len = self.project.gallery_images.len();
        for index in [from, to] {
            if index >= len {
                return Err(EditorError::GalleryIndexOutOfRange { index, len });
            }
        }
        let url = self.project.gallery_images.remove(from);
        self.project.gallery_images.insert(to, url);
        Ok(())
    }

    /// Persists the project and adopts the stored copy (with its id).
    pub async fn save(&mut self, token: &str, store: &dyn PortfolioStore) -> Result<&PortfolioProject, EditorError> {
        if self.is_uploading() {
            return Err(EditorError::UploadInProgress);
        }
        if self.project.title.trim().is_empty() {
            return Err(EditorError::TitleRequired);
        }

        let saved = store.save_project(token, &self.project).await?;
        tracing::info!("Saved portfolio project {:?}", saved.id);
        self.project = saved;
        Ok(&self.project)
    }
}
