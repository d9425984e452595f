use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Fixed set of vault categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SettingCategory {
    Webhooks,
    Analytics,
    Integrations,
    ApiKeys,
    #[default]
    General,
}

impl SettingCategory {
    pub const ALL: [SettingCategory; 5] = [
        SettingCategory::Webhooks,
        SettingCategory::Analytics,
        SettingCategory::Integrations,
        SettingCategory::ApiKeys,
        SettingCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingCategory::Webhooks => "webhooks",
            SettingCategory::Analytics => "analytics",
            SettingCategory::Integrations => "integrations",
            SettingCategory::ApiKeys => "api_keys",
            SettingCategory::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettingCategory::Webhooks => "Webhooks",
            SettingCategory::Analytics => "Analytics",
            SettingCategory::Integrations => "Integrations",
            SettingCategory::ApiKeys => "API keys",
            SettingCategory::General => "General",
        }
    }
}

impl fmt::Display for SettingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// A decrypted vault record as exposed over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SecureSetting {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub category: SettingCategory,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create-or-update payload keyed by `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SettingInput {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub category: SettingCategory,
    #[serde(default)]
    pub description: Option<String>,
}

impl SettingInput {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        category: SettingCategory,
        description: impl Into<String>,
    ) -> Self {
        let description = description.into();
        Self {
            key: key.into(),
            value: value.into(),
            category,
            description: (!description.is_empty()).then_some(description),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.key.trim().is_empty() {
            return Err("Setting key is required".to_string());
        }
        if self.value.is_empty() {
            return Err("Setting value is required".to_string());
        }
        Ok(())
    }
}

/// Row as stored in `secure_settings`, value still encrypted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SecureSettingRow {
    pub id: i64,
    pub key: String,
    pub encrypted_value: String,
    pub category: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Plain admin configuration entry from `app_settings`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AppSettingEntry {
    pub id: i64,
    pub key: String,
    pub value: String,
}

impl AppSettingEntry {
    pub const ADMIN_PASSWORD_HASH: &'static str = "admin_password_hash";
}
