use actix_web::{web, HttpResponse, Result};
use utoipa;

use crate::auth::JwtManager;
use crate::middleware::auth::authenticate_request;
use crate::models::{
    ApiResponse, DeleteSettingQuery, ServiceError, SettingCategory, SettingInput, SettingsListResponse, SettingsQuery,
};
use crate::services::{ProjectSecrets, SettingsService};

fn parse_category(raw: Option<&str>) -> Result<Option<SettingCategory>, ServiceError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => value
            .parse::<SettingCategory>()
            .map(Some)
            .map_err(ServiceError::ValidationError),
    }
}

#[utoipa::path(
    get,
    path = "/api/secure-settings",
    params(SettingsQuery),
    responses(
        (status = 200, description = "Settings list, or a single setting when `key` is given", body = SettingsListResponse),
        (status = 400, description = "Unknown category", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Setting not found", body = ErrorResponse)
    )
)]
pub async fn list_settings(
    settings_service: web::Data<SettingsService>,
    query: web::Query<SettingsQuery>,
    req: actix_web::HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &jwt_manager)?;

    if let Some(key) = query.key.as_deref().filter(|k| !k.is_empty()) {
        let setting = settings_service.get(key).await?;
        return Ok(HttpResponse::Ok().json(setting));
    }

    let category = parse_category(query.category.as_deref())?;
    let settings = settings_service.list(category).await?;

    Ok(HttpResponse::Ok().json(SettingsListResponse { settings }))
}

#[utoipa::path(
    post,
    path = "/api/secure-settings",
    request_body = SettingInput,
    responses(
        (status = 200, description = "Setting created or overwritten by key", body = SecureSetting),
        (status = 400, description = "Missing key or value", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn upsert_setting(
    settings_service: web::Data<SettingsService>,
    form: web::Json<SettingInput>,
    req: actix_web::HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &jwt_manager)?;

    let setting = settings_service.upsert(form.into_inner()).await?;

    Ok(HttpResponse::Ok().json(setting))
}

#[utoipa::path(
    delete,
    path = "/api/secure-settings",
    params(DeleteSettingQuery),
    responses(
        (status = 200, description = "Setting deleted", body = ApiResponse),
        (status = 400, description = "Key parameter missing", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Setting not found", body = ErrorResponse)
    )
)]
pub async fn delete_setting(
    settings_service: web::Data<SettingsService>,
    query: web::Query<DeleteSettingQuery>,
    req: actix_web::HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &jwt_manager)?;

    let key = query
        .key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ServiceError::ValidationError("Key parameter required".to_string()))?;

    let message = settings_service.delete(key).await?;

    Ok(HttpResponse::Ok().json(ApiResponse {
        success: true,
        message,
    }))
}

#[utoipa::path(
    post,
    path = "/api/secure-settings/import",
    responses(
        (status = 200, description = "Project secrets copied into the vault", body = ImportSecretsResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn import_project_secrets(
    settings_service: web::Data<SettingsService>,
    project_secrets: web::Data<ProjectSecrets>,
    req: actix_web::HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &jwt_manager)?;

    let result = settings_service
        .import_project_secrets(&project_secrets)
        .await?;

    Ok(HttpResponse::Ok().json(result))
}
