use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

use agency_admin::auth::JwtManager;
use agency_admin::config::AppConfig;
use agency_admin::database::initialize_database;
use agency_admin::handlers::{self, EmergencyResetKey, MAX_JSON_BODY};
use agency_admin::openapi_config::{configure_openapi, ApiDoc};
use agency_admin::repositories::{
    SqliteAppSettingsRepository, SqlitePortfolioRepository, SqliteSecureSettingsRepository,
};
use agency_admin::services::{
    AuthService, ContactService, PortfolioService, ProjectSecrets, SettingsService, UploadService, SINK_TIMEOUT,
    UPLOADS_ROUTE,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    let pool = initialize_database(&config).await?;

    // Initialize repositories
    let app_settings_repository = Arc::new(SqliteAppSettingsRepository::new(pool.clone()));
    let secure_settings_repository = Arc::new(SqliteSecureSettingsRepository::new(pool.clone()));
    let portfolio_repository = Arc::new(SqlitePortfolioRepository::new(pool.clone()));

    // Initialize services with dependency injection
    let auth_service = web::Data::new(AuthService::new(app_settings_repository));
    if auth_service
        .ensure_admin_password(&config.initial_admin_password)
        .await?
    {
        tracing::warn!("Admin password seeded from ADMIN_PASSWORD (default \"admin\"); change it after first login");
    }

    let settings_service = web::Data::new(SettingsService::new(
        secure_settings_repository,
        config.cipher.clone(),
    ));
    let sink_client = reqwest::Client::builder().timeout(SINK_TIMEOUT).build()?;
    let contact_service = web::Data::new(ContactService::new(
        settings_service.get_ref().clone(),
        sink_client,
        config.telegram_api_base.clone(),
    ));
    let portfolio_service = web::Data::new(PortfolioService::new(portfolio_repository));
    let upload_service = web::Data::new(UploadService::new(
        config.upload_dir.clone(),
        config.public_base_url.clone(),
    ));
    let project_secrets = web::Data::new(ProjectSecrets::from_env());
    let reset_key = web::Data::new(EmergencyResetKey(config.emergency_reset_key.clone()));
    let jwt_manager = web::Data::new(JwtManager::new(&config.jwt_secret));

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let upload_dir = config.upload_dir.clone();

    tracing::info!("Agency admin server listening on http://{}", config.bind_address);
    tracing::info!("API documentation: http://{}/swagger-ui/", config.bind_address);

    // Configure OpenAPI spec with the admin token scheme (do this once, outside the closure)
    let openapi_spec = configure_openapi(ApiDoc::openapi());

    HttpServer::new(move || {
        App::new()
            .app_data(auth_service.clone())
            .app_data(settings_service.clone())
            .app_data(portfolio_service.clone())
            .app_data(upload_service.clone())
            .app_data(contact_service.clone())
            .app_data(project_secrets.clone())
            .app_data(reset_key.clone())
            .app_data(jwt_manager.clone())
            .app_data(web::JsonConfig::default().limit(MAX_JSON_BODY))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(86400),
            )
            .wrap(Logger::default())
            // Swagger UI for API documentation
            .service(
                utoipa_swagger_ui::SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi_spec.clone()),
            )
            .service(actix_files::Files::new(UPLOADS_ROUTE, upload_dir.clone()))
            .configure(handlers::configure_routes)
    })
    .bind(config.bind_address)?
    .run()
    .await?;

    Ok(())
}
