use crate::models::{AppSettingEntry, ServiceError};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
pub trait AppSettingsRepository: Send + Sync {
    async fn find_by_key(&self, key: &str) -> Result<Option<AppSettingEntry>, ServiceError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), ServiceError>;
}

pub struct SqliteAppSettingsRepository {
    pool: SqlitePool,
}

impl SqliteAppSettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppSettingsRepository for SqliteAppSettingsRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<AppSettingEntry>, ServiceError> {
        let row = sqlx::query_as::<_, AppSettingEntry>(
            "SELECT id, key, value FROM app_settings WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        sqlx::query(
            "INSERT INTO app_settings (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
