pub mod auth;
pub mod contact;
pub mod portfolio;
pub mod settings;

// Re-export all handler functions for easy importing
pub use auth::*;
pub use contact::*;
pub use portfolio::*;
pub use settings::*;

use actix_web::web;

/// JSON body limit; base64 image uploads need room beyond actix's default.
pub const MAX_JSON_BODY: usize = 16 * 1024 * 1024;

/// Registers every API route. Shared by the server binary and the integration tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/login", web::post().to(login_api))
        .route("/api/change-password", web::post().to(change_password_api))
        .route("/api/emergency-reset", web::post().to(emergency_reset_api))
        .route("/api/secure-settings", web::get().to(list_settings))
        .route("/api/secure-settings", web::post().to(upsert_setting))
        .route("/api/secure-settings", web::put().to(upsert_setting))
        .route("/api/secure-settings", web::delete().to(delete_setting))
        .route("/api/secure-settings/import", web::post().to(import_project_secrets))
        .route("/api/portfolio", web::get().to(list_projects))
        .route("/api/portfolio", web::post().to(create_project))
        .route("/api/portfolio/{id}", web::get().to(get_project))
        .route("/api/portfolio/{id}", web::put().to(update_project))
        .route("/api/portfolio/{id}", web::delete().to(delete_project))
        .route("/api/upload-portfolio-image", web::post().to(upload_portfolio_image))
        .route("/api/contact", web::post().to(submit_contact));
}
