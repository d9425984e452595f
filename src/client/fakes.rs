//! In-memory collaborators for controller tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use super::api::{ApiError, ImageUploader, PortfolioStore, SettingsApi};
use super::vault::Prompt;
use crate::models::{ImportSecretsResponse, PortfolioProject, SecureSetting, SettingCategory, SettingInput};

#[derive(Default)]
pub struct FakeSettingsApi {
    records: Mutex<BTreeMap<String, SecureSetting>>,
    next_id: AtomicUsize,
    upserts: AtomicUsize,
    imports: AtomicUsize,
    failing_keys: HashSet<String>,
    fail_list: AtomicBool,
    import_response: Option<ImportSecretsResponse>,
    last_token: Mutex<Option<String>>,
}

impl FakeSettingsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(inputs: Vec<SettingInput>) -> Self {
        let api = Self::new();
        for input in &inputs {
            api.store(input);
        }
        api
    }

    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    pub fn with_import_response(mut self, response: ImportSecretsResponse) -> Self {
        self.import_response = Some(response);
        self
    }

    pub fn fail_listing(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn upsert_calls(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn import_calls(&self) -> usize {
        self.imports.load(Ordering::SeqCst)
    }

    pub fn last_token(&self) -> Option<String> {
        self.last_token.lock().unwrap().clone()
    }

    /// Records ordered by category then key.
    pub fn snapshot(&self) -> Vec<SecureSetting> {
        let mut all: Vec<SecureSetting> = self.records.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| (a.category.as_str(), &a.key).cmp(&(b.category.as_str(), &b.key)));
        all
    }

    fn store(&self, input: &SettingInput) -> SecureSetting {
        let mut records = self.records.lock().unwrap();
        let now = Utc::now();
        let record = match records.get(&input.key) {
            Some(existing) => SecureSetting {
                value: input.value.clone(),
                category: input.category,
                description: input.description.clone(),
                updated_at: now,
                ..existing.clone()
            },
            None => SecureSetting {
                id: self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1,
                key: input.key.clone(),
                value: input.value.clone(),
                category: input.category,
                description: input.description.clone(),
                created_at: now,
                updated_at: now,
            },
        };
        records.insert(input.key.clone(), record.clone());
        record
    }

    fn remember(&self, token: &str) {
        *self.last_token.lock().unwrap() = Some(token.to_string());
    }
}

#[async_trait]
impl SettingsApi for FakeSettingsApi {
    async fn list_settings(
        &self,
        token: &str,
        category: Option<SettingCategory>,
    ) -> Result<Vec<SecureSetting>, ApiError> {
        self.remember(token);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|s| category.map_or(true, |c| s.category == c))
            .collect())
    }

    async fn upsert_setting(&self, token: &str, input: &SettingInput) -> Result<SecureSetting, ApiError> {
        self.remember(token);
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.failing_keys.contains(&input.key) {
            return Err(ApiError::Status {
                status: 500,
                body: "Internal server error".to_string(),
            });
        }
        Ok(self.store(input))
    }

    async fn delete_setting(&self, token: &str, key: &str) -> Result<(), ApiError> {
        self.remember(token);
        match self.records.lock().unwrap().remove(key) {
            Some(_) => Ok(()),
            None => Err(ApiError::Status {
                status: 404,
                body: "Setting not found".to_string(),
            }),
        }
    }

    async fn import_project_secrets(&self, token: &str) -> Result<ImportSecretsResponse, ApiError> {
        self.remember(token);
        self.imports.fetch_add(1, Ordering::SeqCst);
        self.import_response.clone().ok_or_else(|| ApiError::Status {
            status: 500,
            body: "import unavailable".to_string(),
        })
    }
}

pub struct FakePrompt {
    answer: bool,
    alerts: Mutex<Vec<String>>,
    questions: Mutex<Vec<String>>,
}

impl FakePrompt {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            alerts: Mutex::new(Vec::new()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::answering(true)
    }

    pub fn declining() -> Self {
        Self::answering(false)
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Prompt for FakePrompt {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap().push(question.to_string());
        self.answer
    }
}

pub struct FakeUploader {
    url: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeUploader {
    pub fn new(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            url: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(data_url, filename)` per request.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageUploader for FakeUploader {
    async fn upload_image(&self, data_url: &str, filename: &str) -> Result<String, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((data_url.to_string(), filename.to_string()));
        self.url
            .clone()
            .ok_or_else(|| ApiError::Network("upload endpoint unreachable".to_string()))
    }
}

/// Answers only after `delay`, for cancellation tests.
pub struct SlowUploader {
    delay: Duration,
}

impl SlowUploader {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ImageUploader for SlowUploader {
    async fn upload_image(&self, _data_url: &str, _filename: &str) -> Result<String, ApiError> {
        tokio::time::sleep(self.delay).await;
        Ok("https://cdn/slow.png".to_string())
    }
}

#[derive(Default)]
pub struct FakePortfolioStore {
    saved: Mutex<Vec<PortfolioProject>>,
}

impl FakePortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<PortfolioProject> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl PortfolioStore for FakePortfolioStore {
    async fn save_project(&self, _token: &str, project: &PortfolioProject) -> Result<PortfolioProject, ApiError> {
        let mut saved = self.saved.lock().unwrap();
        let mut stored = project.clone();
        if stored.id.is_none() {
            stored.id = Some(saved.len() as i64 + 1);
        }
        saved.push(stored.clone());
        Ok(stored)
    }
}
