//! Admin console logic, independent of any rendering layer.

pub mod api;
pub mod legacy;
pub mod migration;
pub mod portfolio;
pub mod preview;
pub mod store;
pub mod vault;

#[cfg(test)]
mod fakes;

pub use api::{ApiError, ClientConfig, HttpAdminClient, ImageUploader, PortfolioStore, SettingsApi};
pub use legacy::{has_unmigrated_settings, LegacyBundle, LegacyDecodeError, LegacyKey};
pub use migration::{MigrationEngine, MigrationError, MigrationReport};
pub use portfolio::{EditorError, ImageFile, ImageSlot, PendingUpload, PortfolioEditor, UploadTarget};
pub use preview::{render_preview, Preview, PreviewMode, Viewport};
pub use store::{session_token, JsonFileStore, KeyValueStore, MemoryStore, StoreError, ADMIN_AUTH_KEY};
pub use vault::{CategoryFilter, LoadState, Prompt, SettingForm, VaultController};
