//! Configuration bundles left in local storage by the pre-vault admin pages.
//!
//! Each well-known key has its own shape. Decoding is per key and fails on
//! malformed JSON; flattening turns every populated field into one vault record.

use serde::Deserialize;
use thiserror::Error;

use super::store::KeyValueStore;
use crate::models::{SettingCategory, SettingInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyKey {
    Analytics,
    Bitrix,
    TelegramBotToken,
    TelegramChatId,
}

impl LegacyKey {
    pub const ALL: [LegacyKey; 4] = [
        LegacyKey::Analytics,
        LegacyKey::Bitrix,
        LegacyKey::TelegramBotToken,
        LegacyKey::TelegramChatId,
    ];

    pub fn storage_key(&self) -> &'static str {
        match self {
            LegacyKey::Analytics => "analytics_settings",
            LegacyKey::Bitrix => "bitrix24_settings",
            LegacyKey::TelegramBotToken => "telegram_bot_token",
            LegacyKey::TelegramChatId => "telegram_chat_id",
        }
    }
}

#[derive(Debug, Error)]
#[error("legacy entry {key} is malformed: {source}")]
pub struct LegacyDecodeError {
    pub key: &'static str,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AnalyticsBundle {
    pub google_analytics_id: Option<String>,
    pub yandex_metrika_id: Option<String>,
    pub yandex_metrika_token: Option<String>,
    pub yandex_webmaster_user_id: Option<String>,
    /// Feature toggle, not a secret; never migrated.
    pub ai_seo_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BitrixBundle {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyBundle {
    Analytics(AnalyticsBundle),
    Bitrix(BitrixBundle),
    TelegramBotToken(String),
    TelegramChatId(String),
}

impl LegacyBundle {
    pub fn decode(key: LegacyKey, raw: &str) -> Result<Self, LegacyDecodeError> {
        let json_err = |source| LegacyDecodeError {
            key: key.storage_key(),
            source,
        };

        Ok(match key {
            LegacyKey::Analytics => LegacyBundle::Analytics(serde_json::from_str(raw).map_err(json_err)?),
            LegacyKey::Bitrix => LegacyBundle::Bitrix(serde_json::from_str(raw).map_err(json_err)?),
            LegacyKey::TelegramBotToken => LegacyBundle::TelegramBotToken(raw.to_string()),
            LegacyKey::TelegramChatId => LegacyBundle::TelegramChatId(raw.to_string()),
        })
    }

    /// Decodes every present legacy key; missing keys are skipped, the first
    /// malformed one aborts the read.
    pub fn read_all(store: &dyn KeyValueStore) -> Result<Vec<LegacyBundle>, LegacyDecodeError> {
        LegacyKey::ALL
            .iter()
            .filter_map(|key| store.get(key.storage_key()).map(|raw| (*key, raw)))
            .map(|(key, raw)| LegacyBundle::decode(key, &raw))
            .collect()
    }

    pub fn into_records(self) -> Vec<SettingInput> {
        let mut records = Vec::new();
        let mut push = |key: &str, value: Option<String>, category, description: &str| {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                records.push(SettingInput::new(key, value, category, description));
            }
        };

        match self {
            LegacyBundle::Analytics(bundle) => {
                push(
                    "yandex_metrika_id",
                    bundle.yandex_metrika_id,
                    SettingCategory::Analytics,
                    "Yandex.Metrika counter ID",
                );
                push(
                    "yandex_metrika_token",
                    bundle.yandex_metrika_token,
                    SettingCategory::Analytics,
                    "OAuth token for the Yandex.Metrika API",
                );
                push(
                    "yandex_webmaster_user_id",
                    bundle.yandex_webmaster_user_id,
                    SettingCategory::Analytics,
                    "Yandex.Webmaster user ID",
                );
                push(
                    "google_analytics_id",
                    bundle.google_analytics_id,
                    SettingCategory::Analytics,
                    "Google Analytics measurement ID",
                );
            }
            LegacyBundle::Bitrix(bundle) => push(
                "bitrix24_webhook_url",
                bundle.webhook_url,
                SettingCategory::Webhooks,
                "Bitrix24 CRM webhook URL",
            ),
            LegacyBundle::TelegramBotToken(token) => push(
                "telegram_bot_token",
                Some(token),
                SettingCategory::Integrations,
                "Telegram bot token for notifications",
            ),
            LegacyBundle::TelegramChatId(chat_id) => push(
                "telegram_chat_id",
                Some(chat_id),
                SettingCategory::Integrations,
                "Telegram chat ID receiving notifications",
            ),
        }

        records
    }
}

/// True when any legacy key is present, whether or not it would decode.
pub fn has_unmigrated_settings(store: &dyn KeyValueStore) -> bool {
    LegacyKey::ALL.iter().any(|key| store.contains(key.storage_key()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::store::MemoryStore;

    #[test]
    fn nothing_present_means_nothing_to_migrate() {
        let store = MemoryStore::new();
        assert!(!has_unmigrated_settings(&store));
        assert!(LegacyBundle::read_all(&store).unwrap().is_empty());
    }

    #[test]
    fn any_single_key_triggers_detection() {
        for key in LegacyKey::ALL {
            let store = MemoryStore::with_entries([(key.storage_key(), "not even json {")]);
            assert!(has_unmigrated_settings(&store), "{:?} not detected", key);
        }
    }

    #[test]
    fn analytics_bundle_flattens_populated_fields_only() {
        let bundle = LegacyBundle::decode(
            LegacyKey::Analytics,
            r#"{"yandex_metrika_id":"12345","yandex_metrika_token":"","google_analytics_id":"G-1","ai_seo_enabled":true}"#,
        )
        .unwrap();

        let records = bundle.into_records();
        let keys: Vec<&str> = records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["yandex_metrika_id", "google_analytics_id"]);
        assert!(records.iter().all(|r| r.category == SettingCategory::Analytics));
    }

    #[test]
    fn bitrix_webhook_is_tagged_webhooks() {
        let records = LegacyBundle::decode(LegacyKey::Bitrix, r#"{"webhook_url":"https://crm/rest/1/abc/"}"#)
            .unwrap()
            .into_records();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "bitrix24_webhook_url");
        assert_eq!(records[0].value, "https://crm/rest/1/abc/");
        assert_eq!(records[0].category, SettingCategory::Webhooks);
    }

    #[test]
    fn telegram_scalars_are_taken_verbatim() {
        let records = LegacyBundle::decode(LegacyKey::TelegramBotToken, "123:ABC")
            .unwrap()
            .into_records();
        assert_eq!(records[0].key, "telegram_bot_token");
        assert_eq!(records[0].value, "123:ABC");
        assert_eq!(records[0].category, SettingCategory::Integrations);

        assert!(LegacyBundle::decode(LegacyKey::TelegramChatId, "")
            .unwrap()
            .into_records()
            .is_empty());
    }

    #[test]
    fn malformed_json_names_the_key() {
        let store = MemoryStore::with_entries([
            ("telegram_bot_token", "123:ABC"),
            ("bitrix24_settings", "{broken"),
        ]);

        let err = LegacyBundle::read_all(&store).unwrap_err();
        assert_eq!(err.key, "bitrix24_settings");
    }
}
