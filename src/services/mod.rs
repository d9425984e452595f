pub mod auth_service;
pub mod contact_service;
pub mod portfolio_service;
pub mod settings_service;
pub mod upload_service;

pub use auth_service::*;
pub use contact_service::*;
pub use portfolio_service::*;
pub use settings_service::*;
pub use upload_service::*;
