//! At-rest encryption for vault values.
//!
//! Values are sealed with ChaCha20-Poly1305 and stored as base64 of
//! `nonce || ciphertext+tag`.

use base64::{engine::general_purpose::STANDARD, Engine};
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::rngs::OsRng;
use thiserror::Error;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("invalid key length; expected 32 bytes")]
    InvalidKeyLength,
    #[error("base64 decoding failed: {0}")]
    Base64DecodeFailed(String),
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}

#[derive(Clone)]
pub struct SecretCipher {
    key: Key,
}

impl SecretCipher {
    pub fn from_key_bytes(key_bytes: &[u8]) -> Result<Self, CipherError> {
        if key_bytes.len() != KEY_LEN {
            return Err(CipherError::InvalidKeyLength);
        }
        let mut key = Key::default();
        key.copy_from_slice(key_bytes);
        Ok(Self { key })
    }

    /// Builds a cipher from a base64-encoded 32 byte key (as found in `ENCRYPTION_KEY`).
    pub fn from_base64(encoded: &str) -> Result<Self, CipherError> {
        let decoded = STANDARD
            .decode(encoded.trim().as_bytes())
            .map_err(|e| CipherError::Base64DecodeFailed(e.to_string()))?;
        Self::from_key_bytes(&decoded)
    }

    /// Fresh random key. Anything sealed with it is unreadable after a restart.
    pub fn generate() -> Self {
        Self {
            key: ChaCha20Poly1305::generate_key(&mut OsRng),
        }
    }

    pub fn key_base64(&self) -> String {
        STANDARD.encode(self.key.as_slice())
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let cipher = ChaCha20Poly1305::new(&self.key);
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(nonce.as_slice());
        sealed.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(sealed))
    }

    pub fn decrypt(&self, sealed: &str) -> Result<String, CipherError> {
        let bytes = STANDARD
            .decode(sealed.as_bytes())
            .map_err(|e| CipherError::Base64DecodeFailed(e.to_string()))?;
        if bytes.len() < NONCE_LEN {
            return Err(CipherError::DecryptionFailed("payload too short".to_string()));
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let cipher = ChaCha20Poly1305::new(&self.key);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| CipherError::DecryptionFailed(e.to_string()))?;
        String::from_utf8(plaintext).map_err(|e| CipherError::DecryptionFailed(e.to_string()))
    }
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretCipher { .. }")
    }
}
