// Re-export all models organized by domain
pub mod api;
pub mod errors;
pub mod portfolio;
pub mod settings;

pub use api::*;
pub use errors::*;
pub use portfolio::*;
pub use settings::*;
