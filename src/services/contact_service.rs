//! Relays the public contact form to the CRM and the team chat.

use std::time::Duration;

use serde_json::{json, Value};

use super::settings_service::SettingsService;
use crate::models::{ContactForm, ContactResponse, ServiceError};

pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const SINK_TIMEOUT: Duration = Duration::from_secs(10);

// Vault keys tried in order: the console's lowercase names, then the imported project secrets.
const BITRIX_WEBHOOK_KEYS: [&str; 2] = ["bitrix24_webhook_url", "BITRIX24_WEBHOOK_URL"];
const TELEGRAM_TOKEN_KEYS: [&str; 2] = ["telegram_bot_token", "TELEGRAM_BOT_TOKEN"];
const TELEGRAM_CHAT_KEYS: [&str; 2] = ["telegram_chat_id", "TELEGRAM_CHAT_ID"];

pub struct ContactService {
    settings: SettingsService,
    http: reqwest::Client,
    telegram_api_base: String,
}

impl ContactService {
    pub fn new(settings: SettingsService, http: reqwest::Client, telegram_api_base: impl Into<String>) -> Self {
        Self {
            settings,
            http,
            telegram_api_base: telegram_api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// First non-empty vault value among `keys`. Lookup failures count as absent.
    async fn credential(&self, keys: &[&str]) -> Option<String> {
        for key in keys {
            match self.settings.get(key).await {
                Ok(setting) if !setting.value.trim().is_empty() => return Some(setting.value.trim().to_string()),
                Ok(_) | Err(ServiceError::NotFound(_)) => {}
                Err(e) => tracing::warn!("Could not read {} from the vault: {}", key, e),
            }
        }
        None
    }

    /// Sends the lead to every configured sink. Unconfigured sinks report `false`.
    pub async fn submit(&self, form: &ContactForm) -> ContactResponse {
        let (bitrix24, telegram) = futures::join!(self.relay_to_bitrix(form), self.relay_to_telegram(form));

        tracing::info!(
            "Contact request from {} relayed (bitrix24: {}, telegram: {})",
            form.name,
            bitrix24,
            telegram
        );

        ContactResponse {
            success: true,
            bitrix24,
            telegram,
            message: "Request sent".to_string(),
        }
    }

    async fn relay_to_bitrix(&self, form: &ContactForm) -> bool {
        let Some(webhook) = self.credential(&BITRIX_WEBHOOK_KEYS).await else {
            tracing::debug!("Bitrix24 webhook not configured, skipping");
            return false;
        };

        let url = format!("{}/crm.lead.add.json", webhook.trim_end_matches('/'));
        match self.post(&url, &bitrix_lead(form)).await {
            Ok(body) => is_truthy(body.get("result")),
            Err(e) => {
                tracing::error!("Bitrix24 error: {}", e);
                false
            }
        }
    }

    async fn relay_to_telegram(&self, form: &ContactForm) -> bool {
        let Some(token) = self.credential(&TELEGRAM_TOKEN_KEYS).await else {
            tracing::debug!("Telegram bot token not configured, skipping");
            return false;
        };
        let Some(chat_id) = self.credential(&TELEGRAM_CHAT_KEYS).await else {
            tracing::debug!("Telegram chat id not configured, skipping");
            return false;
        };

        let url = format!("{}/bot{}/sendMessage", self.telegram_api_base, token);
        let payload = json!({ "chat_id": chat_id, "text": telegram_message(form) });
        match self.post(&url, &payload).await {
            Ok(body) => body.get("ok").and_then(Value::as_bool).unwrap_or(false),
            Err(e) => {
                tracing::error!("Telegram error: {}", e);
                false
            }
        }
    }

    async fn post(&self, url: &str, payload: &Value) -> Result<Value, reqwest::Error> {
        self.http
            .post(url)
            .timeout(SINK_TIMEOUT)
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await
    }
}

fn bitrix_lead(form: &ContactForm) -> Value {
    json!({
        "fields": {
            "TITLE": format!("Contact request: {}", form.name),
            "NAME": form.name,
            "PHONE": [{ "VALUE": form.phone, "VALUE_TYPE": "WORK" }],
            "COMMENTS": format!("Form: {}\nTime: {}", form.form_type, form.timestamp),
            "SOURCE_ID": "WEB",
        }
    })
}

fn telegram_message(form: &ContactForm) -> String {
    format!(
        "New request from the website\n\nName: {}\nPhone: {}\n\nForm: {}\nTime: {}",
        form.name, form.phone, form.form_type, form.timestamp
    )
}

/// Bitrix answers `{"result": <lead id>}` on success.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}
