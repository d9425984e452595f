use crate::models::{PortfolioProject, ServiceError};
use crate::repositories::PortfolioRepository;
use std::sync::Arc;

pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepository>,
}

impl PortfolioService {
    pub fn new(repository: Arc<dyn PortfolioRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<PortfolioProject>, ServiceError> {
        self.repository.find_all(active_only).await
    }

    pub async fn get(&self, id: i64) -> Result<PortfolioProject, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))
    }

    pub async fn create(&self, project: PortfolioProject) -> Result<PortfolioProject, ServiceError> {
        project.validate().map_err(ServiceError::ValidationError)?;

        let id = self.repository.insert(&project).await?;
        tracing::info!("Created portfolio project {} ({})", id, project.title);
        self.get(id).await
    }

    pub async fn update(&self, id: i64, project: PortfolioProject) -> Result<PortfolioProject, ServiceError> {
        project.validate().map_err(ServiceError::ValidationError)?;

        if !self.repository.update(id, &project).await? {
            return Err(ServiceError::NotFound("Project not found".to_string()));
        }
        tracing::info!("Updated portfolio project {}", id);
        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<String, ServiceError> {
        if !self.repository.delete(id).await? {
            return Err(ServiceError::NotFound("Project not found".to_string()));
        }
        tracing::info!("Deleted portfolio project {}", id);
        Ok(format!("Project {} deleted successfully", id))
    }
}
