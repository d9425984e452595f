use crate::models::{SecureSettingRow, ServiceError, SettingCategory};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

const SELECT_COLUMNS: &str =
    "SELECT id, key, encrypted_value, category, description, created_at, updated_at FROM secure_settings";

#[async_trait]
pub trait SecureSettingsRepository: Send + Sync {
    async fn find_all(&self, category: Option<SettingCategory>) -> Result<Vec<SecureSettingRow>, ServiceError>;
    async fn find_by_key(&self, key: &str) -> Result<Option<SecureSettingRow>, ServiceError>;
    /// Insert, or overwrite value/category/description of the row with the same key.
    async fn upsert(
        &self,
        key: &str,
        encrypted_value: &str,
        category: SettingCategory,
        description: Option<&str>,
    ) -> Result<SecureSettingRow, ServiceError>;
    async fn delete_by_key(&self, key: &str) -> Result<bool, ServiceError>;
}

pub struct SqliteSecureSettingsRepository {
    pool: SqlitePool,
}

impl SqliteSecureSettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SecureSettingsRepository for SqliteSecureSettingsRepository {
    async fn find_all(&self, category: Option<SettingCategory>) -> Result<Vec<SecureSettingRow>, ServiceError> {
        let rows = match category {
            Some(category) => {
                sqlx::query_as::<_, SecureSettingRow>(&format!(
                    "{} WHERE category = ? ORDER BY key",
                    SELECT_COLUMNS
                ))
                .bind(category.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, SecureSettingRow>(&format!(
                    "{} ORDER BY category, key",
                    SELECT_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<SecureSettingRow>, ServiceError> {
        let row = sqlx::query_as::<_, SecureSettingRow>(&format!("{} WHERE key = ?", SELECT_COLUMNS))
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn upsert(
        &self,
        key: &str,
        encrypted_value: &str,
        category: SettingCategory,
        description: Option<&str>,
    ) -> Result<SecureSettingRow, ServiceError> {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO secure_settings (key, encrypted_value, category, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                encrypted_value = excluded.encrypted_value,
                category = excluded.category,
                description = excluded.description,
                updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(encrypted_value)
        .bind(category.as_str())
        .bind(description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_key(key)
            .await?
            .ok_or_else(|| ServiceError::DatabaseError(format!("Setting {} vanished after upsert", key)))
    }

    async fn delete_by_key(&self, key: &str) -> Result<bool, ServiceError> {
        let result = sqlx::query("DELETE FROM secure_settings WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
