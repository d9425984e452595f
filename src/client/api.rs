//! Remote collaborators of the admin console and their HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::auth::ADMIN_TOKEN_HEADER;
use crate::models::{
    ImportSecretsResponse, LoginResponse, PortfolioProject, SecureSetting, SettingCategory, SettingInput,
    SettingsListResponse, UploadImageRequest, UploadImageResponse,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// The vault endpoints. Every call carries the admin session token.
#[async_trait]
pub trait SettingsApi: Send + Sync {
    async fn list_settings(
        &self,
        token: &str,
        category: Option<SettingCategory>,
    ) -> Result<Vec<SecureSetting>, ApiError>;

    /// Create-or-update by `key`.
    async fn upsert_setting(&self, token: &str, input: &SettingInput) -> Result<SecureSetting, ApiError>;

    async fn delete_setting(&self, token: &str, key: &str) -> Result<(), ApiError>;

    async fn import_project_secrets(&self, token: &str) -> Result<ImportSecretsResponse, ApiError>;
}

#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Posts an encoded image and returns its public URL.
    async fn upload_image(&self, data_url: &str, filename: &str) -> Result<String, ApiError>;
}

#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Creates the project when it has no id yet, updates it otherwise.
    async fn save_project(&self, token: &str, project: &PortfolioProject) -> Result<PortfolioProject, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the admin backend, without trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }
}

/// reqwest-backed client for the admin backend.
#[derive(Debug, Clone)]
pub struct HttpAdminClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAdminClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match token {
            Some(token) => builder.header(ADMIN_TOKEN_HEADER, token),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Non-2xx responses become `ApiError::Status` carrying the body text.
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Exchanges the admin password for a session token.
    pub async fn login(&self, password: &str) -> Result<String, ApiError> {
        let builder = self
            .request(Method::POST, "/api/login", None)
            .json(&serde_json::json!({ "password": password }));
        let response: LoginResponse = Self::send_json(builder).await?;
        Ok(response.token)
    }
}

#[async_trait]
impl SettingsApi for HttpAdminClient {
    async fn list_settings(
        &self,
        token: &str,
        category: Option<SettingCategory>,
    ) -> Result<Vec<SecureSetting>, ApiError> {
        let mut builder = self.request(Method::GET, "/api/secure-settings", Some(token));
        if let Some(category) = category {
            builder = builder.query(&[("category", category.as_str())]);
        }
        let response: SettingsListResponse = Self::send_json(builder).await?;
        Ok(response.settings)
    }

    async fn upsert_setting(&self, token: &str, input: &SettingInput) -> Result<SecureSetting, ApiError> {
        let builder = self
            .request(Method::POST, "/api/secure-settings", Some(token))
            .json(input);
        Self::send_json(builder).await
    }

    async fn delete_setting(&self, token: &str, key: &str) -> Result<(), ApiError> {
        let builder = self
            .request(Method::DELETE, "/api/secure-settings", Some(token))
            .query(&[("key", key)]);
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    async fn import_project_secrets(&self, token: &str) -> Result<ImportSecretsResponse, ApiError> {
        let builder = self.request(Method::POST, "/api/secure-settings/import", Some(token));
        Self::send_json(builder).await
    }
}

#[async_trait]
impl ImageUploader for HttpAdminClient {
    async fn upload_image(&self, data_url: &str, filename: &str) -> Result<String, ApiError> {
        let builder = self
            .request(Method::POST, "/api/upload-portfolio-image", None)
            .json(&UploadImageRequest {
                image: data_url.to_string(),
                filename: Some(filename.to_string()),
            });
        let response: UploadImageResponse = Self::send_json(builder).await?;
        if response.url.is_empty() {
            return Err(ApiError::Decode("upload response carried no url".to_string()));
        }
        Ok(response.url)
    }
}

#[async_trait]
impl PortfolioStore for HttpAdminClient {
    async fn save_project(&self, token: &str, project: &PortfolioProject) -> Result<PortfolioProject, ApiError> {
        let builder = match project.id {
            Some(id) => self.request(Method::PUT, &format!("/api/portfolio/{}", id), Some(token)),
            None => self.request(Method::POST, "/api/portfolio", Some(token)),
        };
        Self::send_json(builder.json(project)).await
    }
}
