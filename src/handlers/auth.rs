use actix_web::{web, HttpResponse, Result};
use utoipa;

use crate::auth::{JwtManager, SESSION_HOURS};
use crate::middleware::auth::authenticate_request;
use crate::models::{
    ApiResponse, EmergencyResetForm, EmergencyResetResponse, LoginForm, LoginResponse,
    PasswordChangeForm, ServiceError,
};
use crate::services::AuthService;

/// Operator-supplied key gating the emergency reset endpoint.
#[derive(Clone, Default)]
pub struct EmergencyResetKey(pub Option<String>);

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginForm,
    responses(
        (status = 200, description = "Login successful - session token returned in response body", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    security()
)]
pub async fn login_api(
    auth_service: web::Data<AuthService>,
    form: web::Json<LoginForm>,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    if !auth_service.check_password(&form.password).await? {
        tracing::warn!("Rejected admin login attempt");
        return Err(ServiceError::AuthenticationError("Invalid credentials".to_string()));
    }

    let token = jwt_manager
        .generate_token("admin")
        .map_err(|_| ServiceError::InternalError("Failed to generate token".to_string()))?;

    tracing::info!("Admin logged in");
    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        expires_in: SESSION_HOURS * 3600,
    }))
}

#[utoipa::path(
    post,
    path = "/api/change-password",
    request_body = PasswordChangeForm,
    responses(
        (status = 200, description = "Password changed successfully", body = ApiResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Authentication failed", body = ErrorResponse)
    )
)]
pub async fn change_password_api(
    auth_service: web::Data<AuthService>,
    form: web::Json<PasswordChangeForm>,
    req: actix_web::HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &jwt_manager)?;

    let message = auth_service
        .change_password(&form.current_password, &form.new_password, &form.confirm_password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse {
        success: true,
        message,
    }))
}

#[utoipa::path(
    post,
    path = "/api/emergency-reset",
    request_body = EmergencyResetForm,
    responses(
        (status = 200, description = "New password hash generated", body = EmergencyResetResponse),
        (status = 400, description = "Password too short", body = ErrorResponse),
        (status = 401, description = "Reset disabled or wrong reset key", body = ErrorResponse)
    ),
    security()
)]
pub async fn emergency_reset_api(
    auth_service: web::Data<AuthService>,
    reset_key: web::Data<EmergencyResetKey>,
    form: web::Json<EmergencyResetForm>,
) -> Result<HttpResponse, ServiceError> {
    let new_hash = auth_service.generate_reset_hash(
        &form.new_password,
        &form.secret_key,
        reset_key.0.as_deref(),
    )?;

    tracing::warn!("Emergency password hash generated");
    Ok(HttpResponse::Ok().json(EmergencyResetResponse {
        success: true,
        message: "New password hash generated".to_string(),
        new_hash,
        instructions: "Store this hash as admin_password_hash in app_settings".to_string(),
    }))
}
