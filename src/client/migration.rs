//! Moves legacy local-storage configuration into the vault.

use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;

use super::api::SettingsApi;
use super::legacy::{LegacyBundle, LegacyDecodeError};
use super::store::{session_token, KeyValueStore};
use crate::models::SettingInput;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error(transparent)]
    MalformedBundle(#[from] LegacyDecodeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub success: bool,
    pub migrated: usize,
    pub total: usize,
    pub message: String,
}

pub struct MigrationEngine<'a> {
    store: &'a dyn KeyValueStore,
    api: &'a dyn SettingsApi,
}

impl<'a> MigrationEngine<'a> {
    pub fn new(store: &'a dyn KeyValueStore, api: &'a dyn SettingsApi) -> Self {
        Self { store, api }
    }

    /// Normalized records the legacy store currently holds.
    pub fn collect_records(&self) -> Result<Vec<SettingInput>, LegacyDecodeError> {
        Ok(LegacyBundle::read_all(self.store)?
            .into_iter()
            .flat_map(LegacyBundle::into_records)
            .collect())
    }

    /// Upserts every legacy record concurrently and reports how many landed.
    /// The legacy store is left as is, so running again re-submits the same keys.
    pub async fn migrate(&self) -> Result<MigrationReport, MigrationError> {
        let token = session_token(self.store).ok_or(MigrationError::NotAuthenticated)?;

        let records = self.collect_records()?;
        if records.is_empty() {
            return Ok(MigrationReport {
                success: true,
                migrated: 0,
                total: 0,
                message: "No settings to migrate".to_string(),
            });
        }

        let results = join_all(
            records
                .iter()
                .map(|record| self.api.upsert_setting(&token, record)),
        )
        .await;

        let mut migrated = 0;
        for (record, result) in records.iter().zip(&results) {
            match result {
                Ok(_) => migrated += 1,
                Err(e) => tracing::warn!("Failed to migrate {}: {}", record.key, e),
            }
        }

        let total = records.len();
        tracing::info!("Migrated {} of {} legacy settings", migrated, total);

        Ok(MigrationReport {
            success: true,
            migrated,
            total,
            message: format!("Migrated {} of {} settings", migrated, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fakes::FakeSettingsApi;
    use crate::client::store::{MemoryStore, ADMIN_AUTH_KEY};
    use crate::models::SettingCategory;

    fn logged_in(entries: &[(&str, &str)]) -> MemoryStore {
        let store = MemoryStore::with_entries(entries.iter().copied());
        store.set(ADMIN_AUTH_KEY, "session-token").unwrap();
        store
    }

    #[tokio::test]
    async fn refuses_without_session_token() {
        let store = MemoryStore::with_entries([("telegram_bot_token", "123:ABC")]);
        let api = FakeSettingsApi::new();

        let err = MigrationEngine::new(&store, &api).migrate().await.unwrap_err();
        assert!(matches!(err, MigrationError::NotAuthenticated));
        assert_eq!(api.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn empty_store_is_a_no_op() {
        let store = logged_in(&[]);
        let api = FakeSettingsApi::new();

        let report = MigrationEngine::new(&store, &api).migrate().await.unwrap();
        assert!(report.success);
        assert_eq!(report.migrated, 0);
        assert_eq!(report.total, 0);
        assert_eq!(api.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn single_bot_token_becomes_one_integrations_record() {
        let store = logged_in(&[("telegram_bot_token", "123:ABC")]);
        let api = FakeSettingsApi::new();

        let report = MigrationEngine::new(&store, &api).migrate().await.unwrap();
        assert_eq!((report.migrated, report.total), (1, 1));

        let stored = api.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].key, "telegram_bot_token");
        assert_eq!(stored[0].category, SettingCategory::Integrations);
        assert_eq!(api.last_token().as_deref(), Some("session-token"));
    }

    #[tokio::test]
    async fn malformed_bundle_fails_before_any_request() {
        let store = logged_in(&[
            ("telegram_bot_token", "123:ABC"),
            ("analytics_settings", "{not json"),
        ]);
        let api = FakeSettingsApi::new();

        let err = MigrationEngine::new(&store, &api).migrate().await.unwrap_err();
        assert!(matches!(err, MigrationError::MalformedBundle(_)));
        assert_eq!(api.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn one_failure_does_not_block_the_rest() {
        let store = logged_in(&[
            ("telegram_bot_token", "123:ABC"),
            ("telegram_chat_id", "-100"),
            ("bitrix24_settings", r#"{"webhook_url":"https://crm/hook/"}"#),
        ]);
        let api = FakeSettingsApi::new().failing_on("telegram_chat_id");

        let report = MigrationEngine::new(&store, &api).migrate().await.unwrap();
        assert!(report.success);
        assert_eq!((report.migrated, report.total), (2, 3));
        assert_eq!(report.message, "Migrated 2 of 3 settings");
        assert_eq!(api.upsert_calls(), 3);
    }

    #[tokio::test]
    async fn rerun_is_idempotent_and_keeps_legacy_data() {
        let store = logged_in(&[
            ("analytics_settings", r#"{"yandex_metrika_id":"42","google_analytics_id":"G-7"}"#),
            ("telegram_chat_id", "-100"),
        ]);
        let api = FakeSettingsApi::new();
        let engine = MigrationEngine::new(&store, &api);

        engine.migrate().await.unwrap();
        let first = api.snapshot();
        let second_report = engine.migrate().await.unwrap();
        let second = api.snapshot();

        assert_eq!(second_report.migrated, 3);
        assert_eq!(first.len(), 3);
        assert_eq!(
            first.iter().map(|s| (&s.key, &s.value, s.id)).collect::<Vec<_>>(),
            second.iter().map(|s| (&s.key, &s.value, s.id)).collect::<Vec<_>>()
        );
        assert!(crate::client::legacy::has_unmigrated_settings(&store));
    }
}
