use crate::models::{PortfolioProject, PortfolioProjectRow, ServiceError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::SqlitePool;

const SELECT_COLUMNS: &str = "SELECT id, title, description, image_url, preview_image_url, carousel_image_url, \
     gallery_images, website_url, is_active, created_at, updated_at FROM portfolio_projects";

#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    async fn find_all(&self, active_only: bool) -> Result<Vec<PortfolioProject>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<PortfolioProject>, ServiceError>;
    async fn insert(&self, project: &PortfolioProject) -> Result<i64, ServiceError>;
    async fn update(&self, id: i64, project: &PortfolioProject) -> Result<bool, ServiceError>;
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
}

pub struct SqlitePortfolioRepository {
    pool: SqlitePool,
}

impl SqlitePortfolioRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortfolioRepository for SqlitePortfolioRepository {
    async fn find_all(&self, active_only: bool) -> Result<Vec<PortfolioProject>, ServiceError> {
        let sql = if active_only {
            format!("{} WHERE is_active = 1 ORDER BY id", SELECT_COLUMNS)
        } else {
            format!("{} ORDER BY id", SELECT_COLUMNS)
        };

        let rows = sqlx::query_as::<_, PortfolioProjectRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PortfolioProject::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PortfolioProject>, ServiceError> {
        let row = sqlx::query_as::<_, PortfolioProjectRow>(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PortfolioProject::from))
    }

    async fn insert(&self, project: &PortfolioProject) -> Result<i64, ServiceError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO portfolio_projects
                (title, description, image_url, preview_image_url, carousel_image_url,
                 gallery_images, website_url, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.image_url)
        .bind(&project.preview_image_url)
        .bind(&project.carousel_image_url)
        .bind(Json(&project.gallery_images))
        .bind(&project.website_url)
        .bind(project.is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: i64, project: &PortfolioProject) -> Result<bool, ServiceError> {
        let result = sqlx::query(
            "UPDATE portfolio_projects SET
                title = ?, description = ?, image_url = ?, preview_image_url = ?,
                carousel_image_url = ?, gallery_images = ?, website_url = ?, is_active = ?,
                updated_at = ?
             WHERE id = ?",
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.image_url)
        .bind(&project.preview_image_url)
        .bind(&project.carousel_image_url)
        .bind(Json(&project.gallery_images))
        .bind(&project.website_url)
        .bind(project.is_active)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let result = sqlx::query("DELETE FROM portfolio_projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
