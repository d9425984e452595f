use actix_web::{test, web, App, HttpServer};
use agency_admin::{
    auth::{JwtManager, ADMIN_TOKEN_HEADER},
    crypto::SecretCipher,
    database::open_pool,
    handlers::{self, EmergencyResetKey, MAX_JSON_BODY},
    repositories::{SqliteAppSettingsRepository, SqlitePortfolioRepository, SqliteSecureSettingsRepository},
    services::{
        AuthService, ContactService, PortfolioService, ProjectSecrets, SettingsService, UploadService,
        TELEGRAM_API_BASE,
    },
};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const ADMIN_PASSWORD: &str = "admin-secret";
pub const RESET_KEY: &str = "break-glass";
pub const PUBLIC_BASE_URL: &str = "http://admin.test";

/// Everything the app factory needs, cloneable into server workers.
#[derive(Clone)]
struct Wiring {
    pool: SqlitePool,
    jwt_manager: JwtManager,
    cipher: SecretCipher,
    project_secrets: ProjectSecrets,
    upload_dir: PathBuf,
    telegram_api_base: String,
}

fn build_app(
    wiring: Wiring,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app_settings_repository = Arc::new(SqliteAppSettingsRepository::new(wiring.pool.clone()));
    let secure_settings_repository = Arc::new(SqliteSecureSettingsRepository::new(wiring.pool.clone()));
    let portfolio_repository = Arc::new(SqlitePortfolioRepository::new(wiring.pool.clone()));

    let settings_service = SettingsService::new(secure_settings_repository, wiring.cipher.clone());
    let contact_service = ContactService::new(
        settings_service.clone(),
        reqwest::Client::new(),
        wiring.telegram_api_base.clone(),
    );

    App::new()
        .app_data(web::Data::new(AuthService::new(app_settings_repository)))
        .app_data(web::Data::new(settings_service))
        .app_data(web::Data::new(contact_service))
        .app_data(web::Data::new(PortfolioService::new(portfolio_repository)))
        .app_data(web::Data::new(UploadService::new(wiring.upload_dir.clone(), PUBLIC_BASE_URL)))
        .app_data(web::Data::new(wiring.project_secrets.clone()))
        .app_data(web::Data::new(EmergencyResetKey(Some(RESET_KEY.to_string()))))
        .app_data(web::Data::new(wiring.jwt_manager.clone()))
        .app_data(web::JsonConfig::default().limit(MAX_JSON_BODY))
        .configure(handlers::configure_routes)
}

pub struct TestApp {
    pub pool: SqlitePool,
    pub jwt_manager: JwtManager,
    pub cipher: SecretCipher,
    pub project_secrets: ProjectSecrets,
    pub telegram_api_base: String,
    #[allow(dead_code)]
    pub temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_project_secrets(ProjectSecrets::default()).await
    }

    pub async fn with_project_secrets(project_secrets: ProjectSecrets) -> Self {
        // Create temporary database
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let database_url = format!("sqlite://{}", db_path.display());

        let pool = open_pool(&database_url, 1)
            .await
            .expect("Failed to open test database");

        AuthService::new(Arc::new(SqliteAppSettingsRepository::new(pool.clone())))
            .ensure_admin_password(ADMIN_PASSWORD)
            .await
            .expect("Failed to seed admin password");

        Self {
            pool,
            jwt_manager: JwtManager::new("test_secret_key"),
            cipher: SecretCipher::generate(),
            project_secrets,
            telegram_api_base: TELEGRAM_API_BASE.to_string(),
            temp_dir,
        }
    }

    /// Points the contact relay's Telegram calls at a local stand-in.
    #[allow(dead_code)]
    pub fn with_telegram_api_base(mut self, base: impl Into<String>) -> Self {
        self.telegram_api_base = base.into();
        self
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.temp_dir.path().join("uploads")
    }

    fn wiring(&self) -> Wiring {
        Wiring {
            pool: self.pool.clone(),
            jwt_manager: self.jwt_manager.clone(),
            cipher: self.cipher.clone(),
            project_secrets: self.project_secrets.clone(),
            upload_dir: self.upload_dir(),
            telegram_api_base: self.telegram_api_base.clone(),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        build_app(self.wiring())
    }

    /// Serves the full route table on an ephemeral local port and returns its base URL.
    #[allow(dead_code)]
    pub fn spawn_server(&self) -> String {
        let wiring = self.wiring();
        let server = HttpServer::new(move || build_app(wiring.clone()))
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .expect("Failed to bind test server");
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }

    pub async fn login_and_get_token(&self) -> String {
        let app = test::init_service(self.create_app()).await;

        let login_req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(serde_json::json!({ "password": ADMIN_PASSWORD }))
            .to_request();

        let resp = test::call_service(&app, login_req).await;
        let body: serde_json::Value = test::read_body_json(resp).await;

        body["token"].as_str().unwrap().to_string()
    }
}

/// Attaches the admin session header.
#[allow(dead_code)]
pub fn with_token(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((ADMIN_TOKEN_HEADER, token.to_string()))
}
