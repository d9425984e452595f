use std::net::SocketAddr;
use std::path::PathBuf;

use crate::crypto::SecretCipher;
use crate::services::TELEGRAM_API_BASE;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: SocketAddr,
    pub jwt_secret: String,
    pub cipher: SecretCipher,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    pub emergency_reset_key: Option<String>,
    pub initial_admin_password: String,
    pub telegram_api_base: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .unwrap_or(5000);

        let bind_address = format!("{}:{}", host, port)
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("Invalid bind address {}:{}: {}", host, port, e))?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:agency_admin.db".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            use rand::Rng;
            let mut rng = rand::thread_rng();
            let bytes: [u8; 32] = rng.gen();
            use base64::Engine;
            base64::engine::general_purpose::STANDARD.encode(bytes)
        });

        let cipher = match std::env::var("ENCRYPTION_KEY") {
            Ok(encoded) => SecretCipher::from_base64(&encoded)?,
            Err(_) => {
                tracing::warn!(
                    "ENCRYPTION_KEY not set; using a random key, stored secrets will not survive a restart"
                );
                SecretCipher::generate()
            }
        };

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        let emergency_reset_key = std::env::var("EMERGENCY_RESET_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let initial_admin_password = std::env::var("ADMIN_PASSWORD")
            .unwrap_or_else(|_| "admin".to_string());

        let telegram_api_base = std::env::var("TELEGRAM_API_BASE")
            .unwrap_or_else(|_| TELEGRAM_API_BASE.to_string());

        Ok(Self {
            database_url,
            bind_address,
            jwt_secret,
            cipher,
            upload_dir,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            emergency_reset_key,
            initial_admin_password,
            telegram_api_base,
        })
    }
}
