use crate::auth::{hash_password, verify_password};
use crate::models::{AppSettingEntry, ServiceError};
use crate::repositories::AppSettingsRepository;
use std::sync::Arc;

pub const MIN_PASSWORD_LEN: usize = 8;

pub struct AuthService {
    repository: Arc<dyn AppSettingsRepository>,
}

impl AuthService {
    pub fn new(repository: Arc<dyn AppSettingsRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_admin_password_hash(&self) -> Result<Option<String>, ServiceError> {
        Ok(self
            .repository
            .find_by_key(AppSettingEntry::ADMIN_PASSWORD_HASH)
            .await?
            .map(|entry| entry.value))
    }

    /// Seeds the admin password on first start; an existing hash is left alone.
    pub async fn ensure_admin_password(&self, initial_password: &str) -> Result<bool, ServiceError> {
        if self.get_admin_password_hash().await?.is_some() {
            return Ok(false);
        }

        let hash = hash_password(initial_password)
            .map_err(|e| ServiceError::InternalError(format!("Failed to hash password: {}", e)))?;
        self.repository
            .set(AppSettingEntry::ADMIN_PASSWORD_HASH, &hash)
            .await?;

        tracing::info!("Initialized admin password");
        Ok(true)
    }

    pub async fn check_password(&self, password: &str) -> Result<bool, ServiceError> {
        match self.get_admin_password_hash().await? {
            Some(hash) => Ok(verify_password(password, &hash)),
            None => Ok(false),
        }
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<String, ServiceError> {
        if current_password.is_empty() || new_password.is_empty() || confirm_password.is_empty() {
            return Err(ServiceError::ValidationError("All fields are required".to_string()));
        }

        if new_password != confirm_password {
            return Err(ServiceError::ValidationError("New passwords do not match".to_string()));
        }

        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::ValidationError(format!(
                "New password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }

        if !self.check_password(current_password).await? {
            return Err(ServiceError::AuthenticationError(
                "Current password is incorrect".to_string(),
            ));
        }

        let hash = hash_password(new_password)
            .map_err(|e| ServiceError::InternalError(format!("Failed to hash password: {}", e)))?;
        self.repository
            .set(AppSettingEntry::ADMIN_PASSWORD_HASH, &hash)
            .await?;

        tracing::info!("Admin password updated");
        Ok("Password updated successfully".to_string())
    }

    /// Produces a hash for the operator to install by hand. Nothing is stored.
    pub fn generate_reset_hash(
        &self,
        new_password: &str,
        secret_key: &str,
        expected_key: Option<&str>,
    ) -> Result<String, ServiceError> {
        let expected = expected_key.ok_or_else(|| {
            ServiceError::AuthenticationError("Emergency reset is disabled".to_string())
        })?;
        if secret_key != expected {
            return Err(ServiceError::AuthenticationError("Invalid reset key".to_string()));
        }

        if new_password.is_empty() {
            return Err(ServiceError::ValidationError("New password required".to_string()));
        }
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        hash_password(new_password)
            .map_err(|e| ServiceError::InternalError(format!("Failed to hash password: {}", e)))
    }
}
