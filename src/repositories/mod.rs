pub mod app_settings_repository;
pub mod portfolio_repository;
pub mod settings_repository;

pub use app_settings_repository::*;
pub use portfolio_repository::*;
pub use settings_repository::*;
