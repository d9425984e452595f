use crate::crypto::SecretCipher;
use crate::models::{
    ImportSecretsResponse, SecureSetting, SecureSettingRow, ServiceError, SettingCategory, SettingInput,
};
use crate::repositories::SecureSettingsRepository;
use std::collections::HashMap;
use std::sync::Arc;

/// Environment-level secrets the import endpoint knows how to copy into the vault.
pub const IMPORTABLE_SECRETS: [(&str, SettingCategory, &str); 5] = [
    ("OPENAI_API_KEY", SettingCategory::ApiKeys, "OpenAI API key (copied from project secrets)"),
    ("OPENAI_API_BASE", SettingCategory::ApiKeys, "OpenAI API base URL (copied from project secrets)"),
    ("BITRIX24_WEBHOOK_URL", SettingCategory::Webhooks, "Bitrix24 CRM webhook URL (copied from project secrets)"),
    ("TELEGRAM_BOT_TOKEN", SettingCategory::Integrations, "Telegram bot token (copied from project secrets)"),
    ("TELEGRAM_CHAT_ID", SettingCategory::Integrations, "Telegram chat ID (copied from project secrets)"),
];

/// Snapshot of the project-level secrets available to the import operation.
#[derive(Debug, Clone, Default)]
pub struct ProjectSecrets {
    values: HashMap<String, String>,
}

impl ProjectSecrets {
    pub fn from_env() -> Self {
        let values = IMPORTABLE_SECRETS
            .iter()
            .filter_map(|(name, _, _)| std::env::var(name).ok().map(|value| (name.to_string(), value)))
            .collect();
        Self { values }
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

#[derive(Clone)]
pub struct SettingsService {
    repository: Arc<dyn SecureSettingsRepository>,
    cipher: SecretCipher,
}

impl SettingsService {
    pub fn new(repository: Arc<dyn SecureSettingsRepository>, cipher: SecretCipher) -> Self {
        Self { repository, cipher }
    }

    fn open(&self, row: SecureSettingRow) -> Result<SecureSetting, ServiceError> {
        let category = row.category.parse::<SettingCategory>().unwrap_or_else(|_| {
            tracing::warn!("Setting {} has unknown category {}, reporting as general", row.key, row.category);
            SettingCategory::General
        });

        Ok(SecureSetting {
            id: row.id,
            value: self.cipher.decrypt(&row.encrypted_value)?,
            key: row.key,
            category,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    pub async fn list(&self, category: Option<SettingCategory>) -> Result<Vec<SecureSetting>, ServiceError> {
        self.repository
            .find_all(category)
            .await?
            .into_iter()
            .map(|row| self.open(row))
            .collect()
    }

    pub async fn get(&self, key: &str) -> Result<SecureSetting, ServiceError> {
        let row = self
            .repository
            .find_by_key(key)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Setting not found".to_string()))?;
        self.open(row)
    }

    pub async fn upsert(&self, input: SettingInput) -> Result<SecureSetting, ServiceError> {
        input.validate().map_err(ServiceError::ValidationError)?;

        let key = input.key.trim();
        let encrypted = self.cipher.encrypt(&input.value)?;
        let description = input.description.as_deref().filter(|d| !d.is_empty());

        let row = self
            .repository
            .upsert(key, &encrypted, input.category, description)
            .await?;

        tracing::info!("Stored setting {} in category {}", key, input.category);
        self.open(row)
    }

    pub async fn delete(&self, key: &str) -> Result<String, ServiceError> {
        if !self.repository.delete_by_key(key).await? {
            return Err(ServiceError::NotFound("Setting not found".to_string()));
        }

        tracing::info!("Deleted setting {}", key);
        Ok("Setting deleted".to_string())
    }

    /// Copies every configured project secret into the vault, overwriting by key.
    /// Secrets missing from the source are reported as skipped.
    pub async fn import_project_secrets(
        &self,
        source: &ProjectSecrets,
    ) -> Result<ImportSecretsResponse, ServiceError> {
        let mut copied = Vec::new();
        let mut skipped = Vec::new();

        for (name, category, description) in IMPORTABLE_SECRETS {
            match source.get(name) {
                Some(value) => {
                    self.upsert(SettingInput::new(name, value, category, description))
                        .await?;
                    copied.push(name.to_string());
                }
                None => skipped.push(name.to_string()),
            }
        }

        tracing::info!("Imported {} project secrets, skipped {}", copied.len(), skipped.len());

        Ok(ImportSecretsResponse {
            success: true,
            message: format!("Copied {} keys into the vault", copied.len()),
            copied,
            skipped,
        })
    }
}
