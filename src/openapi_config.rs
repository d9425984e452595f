use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityRequirement, SecurityScheme};
use utoipa::openapi::OpenApi;

use crate::auth::ADMIN_TOKEN_HEADER;
use crate::handlers;
use crate::models;

#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        handlers::auth::login_api,
        handlers::auth::change_password_api,
        handlers::auth::emergency_reset_api,
        handlers::settings::list_settings,
        handlers::settings::upsert_setting,
        handlers::settings::delete_setting,
        handlers::settings::import_project_secrets,
        handlers::portfolio::list_projects,
        handlers::portfolio::get_project,
        handlers::portfolio::create_project,
        handlers::portfolio::update_project,
        handlers::portfolio::delete_project,
        handlers::portfolio::upload_portfolio_image,
        handlers::contact::submit_contact,
    ),
    components(schemas(
        models::LoginForm,
        models::LoginResponse,
        models::PasswordChangeForm,
        models::EmergencyResetForm,
        models::EmergencyResetResponse,
        models::ApiResponse,
        models::ErrorResponse,
        models::SettingCategory,
        models::SecureSetting,
        models::SettingInput,
        models::SettingsListResponse,
        models::ImportSecretsResponse,
        models::PortfolioProject,
        models::UploadImageRequest,
        models::UploadImageResponse,
        models::ContactForm,
        models::ContactResponse,
    )),
    info(title = "Agency admin API", description = "Secrets vault, portfolio, upload and contact endpoints of the agency admin console")
)]
pub struct ApiDoc;

pub fn configure_openapi(mut openapi: OpenApi) -> OpenApi {
    // Admin session token travels in a custom header, not as a Bearer token
    if let Some(components) = openapi.components.as_mut() {
        components.add_security_scheme(
            "admin_token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_TOKEN_HEADER))),
        );
    }

    // Global requirement; public endpoints opt out with security()
    openapi.security = Some(vec![SecurityRequirement::new(
        "admin_token",
        Vec::<String>::new(),
    )]);

    openapi
}
