use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use utoipa::{self, IntoParams};

use crate::auth::JwtManager;
use crate::middleware::auth::authenticate_request;
use crate::models::{ApiResponse, PortfolioProject, ServiceError, UploadImageRequest};
use crate::services::{PortfolioService, UploadService};

#[derive(Debug, Deserialize, IntoParams)]
pub struct PortfolioListQuery {
    /// Include hidden projects (admin view)
    #[serde(default)]
    pub include_inactive: bool,
}

#[utoipa::path(
    get,
    path = "/api/portfolio",
    params(PortfolioListQuery),
    responses(
        (status = 200, description = "Portfolio projects; hidden ones only with include_inactive and a valid token", body = [PortfolioProject]),
        (status = 401, description = "include_inactive without a valid token", body = ErrorResponse)
    ),
    security()
)]
pub async fn list_projects(
    portfolio_service: web::Data<PortfolioService>,
    query: web::Query<PortfolioListQuery>,
    req: actix_web::HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    if query.include_inactive {
        authenticate_request(&req, &jwt_manager)?;
    }

    let projects = portfolio_service.list(!query.include_inactive).await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[utoipa::path(
    get,
    path = "/api/portfolio/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project", body = PortfolioProject),
        (status = 404, description = "Project not found", body = ErrorResponse)
    ),
    security()
)]
pub async fn get_project(
    portfolio_service: web::Data<PortfolioService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServiceError> {
    let project = portfolio_service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[utoipa::path(
    post,
    path = "/api/portfolio",
    request_body = PortfolioProject,
    responses(
        (status = 200, description = "Project created", body = PortfolioProject),
        (status = 400, description = "Title or gallery out of bounds", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn create_project(
    portfolio_service: web::Data<PortfolioService>,
    form: web::Json<PortfolioProject>,
    req: actix_web::HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &jwt_manager)?;

    let project = portfolio_service.create(form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[utoipa::path(
    put,
    path = "/api/portfolio/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    request_body = PortfolioProject,
    responses(
        (status = 200, description = "Project updated", body = PortfolioProject),
        (status = 400, description = "Title or gallery out of bounds", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
pub async fn update_project(
    portfolio_service: web::Data<PortfolioService>,
    path: web::Path<i64>,
    form: web::Json<PortfolioProject>,
    req: actix_web::HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &jwt_manager)?;

    let project = portfolio_service
        .update(path.into_inner(), form.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(project))
}

#[utoipa::path(
    delete,
    path = "/api/portfolio/{id}",
    params(
        ("id" = i64, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project deleted", body = ApiResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
pub async fn delete_project(
    portfolio_service: web::Data<PortfolioService>,
    path: web::Path<i64>,
    req: actix_web::HttpRequest,
    jwt_manager: web::Data<JwtManager>,
) -> Result<HttpResponse, ServiceError> {
    authenticate_request(&req, &jwt_manager)?;

    let message = portfolio_service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse {
        success: true,
        message,
    }))
}

#[utoipa::path(
    post,
    path = "/api/upload-portfolio-image",
    request_body = UploadImageRequest,
    responses(
        (status = 200, description = "Image stored, public URL returned", body = UploadImageResponse),
        (status = 400, description = "Missing or non-image payload", body = ErrorResponse)
    ),
    security()
)]
pub async fn upload_portfolio_image(
    upload_service: web::Data<UploadService>,
    form: web::Json<UploadImageRequest>,
) -> Result<HttpResponse, ServiceError> {
    let stored = upload_service.store_image(&form).await?;
    Ok(HttpResponse::Ok().json(stored))
}
