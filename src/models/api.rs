use crate::models::settings::SecureSetting;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// REQUEST TYPES
// =============================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct PasswordChangeForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct EmergencyResetForm {
    pub new_password: String,
    pub secret_key: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SettingsQuery {
    /// Restrict the listing to one category
    pub category: Option<String>,
    /// Fetch a single record
    pub key: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteSettingQuery {
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadImageRequest {
    /// Data URL (`data:image/png;base64,...`) or bare base64
    pub image: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Site contact form. Missing fields fall back to placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactForm {
    #[serde(default = "not_specified")]
    pub name: String,
    #[serde(default = "not_specified")]
    pub phone: String,
    #[serde(rename = "type", default = "default_form_type")]
    pub form_type: String,
    #[serde(default)]
    pub timestamp: String,
}

fn not_specified() -> String {
    "Not specified".to_string()
}

fn default_form_type() -> String {
    "contact_form".to_string()
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

// Common response types
#[derive(Serialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Serialize, ToSchema)]
pub struct EmergencyResetResponse {
    pub success: bool,
    pub message: String,
    pub new_hash: String,
    pub instructions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingsListResponse {
    pub settings: Vec<SecureSetting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportSecretsResponse {
    #[serde(default)]
    pub success: bool,
    pub message: String,
    pub copied: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadImageResponse {
    pub url: String,
    #[serde(default)]
    pub filename: String,
}

/// Delivery outcome per sink. `success` only says the request was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub success: bool,
    pub bitrix24: bool,
    pub telegram: bool,
    pub message: String,
}
