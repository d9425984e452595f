//! Headless controller behind the secrets vault page.

use std::sync::Arc;

use super::api::SettingsApi;
use super::legacy::has_unmigrated_settings;
use super::migration::MigrationEngine;
use super::store::{session_token, KeyValueStore};
use crate::models::{SecureSetting, SettingCategory, SettingInput};

/// User-facing notifications and yes/no questions.
pub trait Prompt: Send + Sync {
    fn alert(&self, message: &str);
    fn confirm(&self, question: &str) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(SettingCategory),
}

impl CategoryFilter {
    pub fn category(&self) -> Option<SettingCategory> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(category) => Some(*category),
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" | "" => Ok(CategoryFilter::All),
            other => other.parse().map(CategoryFilter::Only),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingForm {
    pub key: String,
    pub value: String,
    pub category: SettingCategory,
    pub description: String,
    pub editing: bool,
}

impl Default for SettingForm {
    fn default() -> Self {
        Self {
            key: String::new(),
            value: String::new(),
            category: SettingCategory::Webhooks,
            description: String::new(),
            editing: false,
        }
    }
}

impl SettingForm {
    fn to_input(&self) -> SettingInput {
        let description = self.description.trim();
        SettingInput {
            key: self.key.trim().to_string(),
            value: self.value.clone(),
            category: self.category,
            description: (!description.is_empty()).then(|| description.to_string()),
        }
    }
}

pub struct VaultController<A: SettingsApi, P: Prompt> {
    api: A,
    prompt: P,
    store: Arc<dyn KeyValueStore>,
    pub state: LoadState,
    pub settings: Vec<SecureSetting>,
    pub selected_category: CategoryFilter,
    pub form: Option<SettingForm>,
    pub saving: bool,
    pub migrating: bool,
    pub copying_secrets: bool,
    pub show_migration_alert: bool,
}

impl<A: SettingsApi, P: Prompt> VaultController<A, P> {
    pub fn new(api: A, prompt: P, store: Arc<dyn KeyValueStore>) -> Self {
        let show_migration_alert = has_unmigrated_settings(store.as_ref());
        Self {
            api,
            prompt,
            store,
            state: LoadState::Idle,
            settings: Vec::new(),
            selected_category: CategoryFilter::All,
            form: None,
            saving: false,
            migrating: false,
            copying_secrets: false,
            show_migration_alert,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    // An absent session still reaches the server, which answers 401.
    fn token(&self) -> String {
        session_token(self.store.as_ref()).unwrap_or_default()
    }

    pub async fn load(&mut self) {
        self.state = LoadState::Loading;
        let token = self.token();

        match self.api.list_settings(&token, self.selected_category.category()).await {
            Ok(settings) => {
                self.settings = settings;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                tracing::error!("Failed to load settings: {}", e);
                self.state = LoadState::Error(e.to_string());
            }
        }
    }

    pub async fn select_category(&mut self, filter: CategoryFilter) {
        self.selected_category = filter;
        self.load().await;
    }

    pub fn open_add_form(&mut self) {
        self.form = Some(SettingForm::default());
    }

    pub fn toggle_add_form(&mut self) {
        if self.form.is_some() {
            self.cancel_form();
        } else {
            self.open_add_form();
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    pub fn edit(&mut self, setting: &SecureSetting) {
        self.form = Some(SettingForm {
            key: setting.key.clone(),
            value: setting.value.clone(),
            category: setting.category,
            description: setting.description.clone().unwrap_or_default(),
            editing: true,
        });
    }

    /// The key of an existing record cannot change.
    pub fn set_form_key(&mut self, key: impl Into<String>) {
        if let Some(form) = self.form.as_mut().filter(|form| !form.editing) {
            form.key = key.into();
        }
    }

    pub fn set_form_value(&mut self, value: impl Into<String>) {
        if let Some(form) = self.form.as_mut() {
            form.value = value.into();
        }
    }

    pub fn set_form_category(&mut self, category: SettingCategory) {
        if let Some(form) = self.form.as_mut() {
            form.category = category;
        }
    }

    pub fn set_form_description(&mut self, description: impl Into<String>) {
        if let Some(form) = self.form.as_mut() {
            form.description = description.into();
        }
    }

    pub fn can_save(&self) -> bool {
        !self.saving
            && self
                .form
                .as_ref()
                .is_some_and(|form| !form.key.trim().is_empty() && !form.value.is_empty())
    }

    /// Returns true when the record was stored.
    pub async fn save(&mut self) -> bool {
        if self.saving {
            return false;
        }
        let Some(form) = self.form.as_ref() else {
            return false;
        };
        let input = form.to_input();
        if let Err(message) = input.validate() {
            self.prompt.alert(&message);
            return false;
        }

        self.saving = true;
        let token = self.token();
        let result = self.api.upsert_setting(&token, &input).await;
        self.saving = false;

        match result {
            Ok(saved) => {
                tracing::info!("Saved setting {}", saved.key);
                self.form = None;
                self.load().await;
                true
            }
            Err(e) => {
                tracing::error!("Failed to save setting {}: {}", input.key, e);
                self.prompt.alert(&format!("Save failed: {}", e));
                false
            }
        }
    }

    pub async fn delete(&mut self, key: &str) -> bool {
        if !self.prompt.confirm("Delete this setting?") {
            return false;
        }

        let token = self.token();
        match self.api.delete_setting(&token, key).await {
            Ok(()) => {
                self.load().await;
                true
            }
            Err(e) => {
                tracing::error!("Failed to delete setting {}: {}", key, e);
                self.prompt.alert(&format!("Delete failed: {}", e));
                false
            }
        }
    }

    pub async fn import_from_project_secrets(&mut self) {
        if !self
            .prompt
            .confirm("Copy the project secrets into the vault? They become editable from the admin console.")
        {
            return;
        }

        self.copying_secrets = true;
        let token = self.token();
        let result = self.api.import_project_secrets(&token).await;
        self.copying_secrets = false;

        match result {
            Ok(summary) => {
                self.load().await;
                let mut message = format!("{}\n\nCopied: {}", summary.message, summary.copied.join(", "));
                if !summary.skipped.is_empty() {
                    message.push_str(&format!("\nSkipped: {}", summary.skipped.join(", ")));
                }
                self.prompt.alert(&message);
            }
            Err(e) => {
                tracing::error!("Failed to copy secrets: {}", e);
                self.prompt.alert(&format!("Copy failed: {}", e));
            }
        }
    }

    pub async fn run_migration(&mut self) {
        self.migrating = true;
        let outcome = MigrationEngine::new(self.store.as_ref(), &self.api).migrate().await;
        self.migrating = false;

        match outcome {
            Ok(report) => {
                self.show_migration_alert = false;
                self.load().await;
                self.prompt.alert(&report.message);
            }
            Err(e) => {
                tracing::error!("Migration failed: {}", e);
                self.prompt.alert(&format!("Migration failed: {}", e));
            }
        }
    }
}
