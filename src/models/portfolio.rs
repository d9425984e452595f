use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Hard cap on project titles, in characters.
pub const MAX_TITLE_CHARS: usize = 10;

/// Maximum number of gallery images per project.
pub const MAX_GALLERY_IMAGES: usize = 5;

/// Portfolio project as edited in the admin console and stored by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PortfolioProject {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub preview_image_url: Option<String>,
    #[serde(default)]
    pub carousel_image_url: Option<String>,
    #[serde(default)]
    pub gallery_images: Vec<String>,
    #[serde(default)]
    pub website_url: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl PortfolioProject {
    pub fn new() -> Self {
        Self {
            is_active: true,
            ..Default::default()
        }
    }

    /// Checks the invariants the backend enforces before persisting.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Project title is required".to_string());
        }
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(format!(
                "Project title must be at most {} characters",
                MAX_TITLE_CHARS
            ));
        }
        if self.gallery_images.len() > MAX_GALLERY_IMAGES {
            return Err(format!(
                "Gallery can hold at most {} images",
                MAX_GALLERY_IMAGES
            ));
        }
        Ok(())
    }
}

/// Database row for `portfolio_projects`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PortfolioProjectRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub preview_image_url: Option<String>,
    pub carousel_image_url: Option<String>,
    pub gallery_images: sqlx::types::Json<Vec<String>>,
    pub website_url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PortfolioProjectRow> for PortfolioProject {
    fn from(row: PortfolioProjectRow) -> Self {
        Self {
            id: Some(row.id),
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            preview_image_url: row.preview_image_url,
            carousel_image_url: row.carousel_image_url,
            gallery_images: row.gallery_images.0,
            website_url: row.website_url,
            is_active: row.is_active,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_project_is_active() {
        assert!(PortfolioProject::new().is_active);
    }

    #[test]
    fn missing_is_active_defaults_to_visible() {
        let project: PortfolioProject = serde_json::from_str(r#"{"title":"Site"}"#).unwrap();
        assert!(project.is_active);
        assert!(project.gallery_images.is_empty());
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        let mut project = PortfolioProject::new();
        project.title = "Привет мир".to_string();
        assert_eq!(project.title.chars().count(), 10);
        assert!(project.validate().is_ok());

        project.title.push('!');
        assert!(project.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_gallery() {
        let mut project = PortfolioProject::new();
        project.title = "Shop".to_string();
        project.gallery_images = (0..6).map(|i| format!("https://img/{}", i)).collect();
        assert!(project.validate().is_err());
    }
}
