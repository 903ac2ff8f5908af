//! AES-256-GCM encryption utilities for securing API keys stored in the database.
//!
//! Credentials are encrypted before storage and decrypted on read. The
//! encryption key is a 32-byte key provided via the ENCRYPTION_KEY environment
//! variable (hex-encoded). When no key is configured, [`generate_key`] produces
//! an ephemeral key for the process lifetime; records encrypted under it become
//! unreadable after a restart, so the generated key must be surfaced to
//! operators at startup.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::Rng;
use thiserror::Error;

/// 12-byte nonce size for AES-GCM
const NONCE_SIZE: usize = 12;

/// 32-byte key size for AES-256
const KEY_SIZE: usize = 32;

/// Errors that can occur during encryption/decryption operations
#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("Invalid encryption key: must be 32 bytes (64 hex characters)")]
    InvalidKey,

    #[error("Failed to decode hex key: {0}")]
    HexDecodeError(#[from] hex::FromHexError),

    #[error("Failed to decode base64 ciphertext: {0}")]
    Base64DecodeError(#[from] base64::DecodeError),

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed - data may be corrupted or key is incorrect")]
    DecryptionFailed,

    #[error("Ciphertext too short - missing nonce")]
    CiphertextTooShort,
}

/// Encrypts plaintext using AES-256-GCM with a random nonce.
///
/// The nonce is prepended to the ciphertext, and the result is base64-encoded
/// for safe storage in a text database column.
pub fn encrypt(plaintext: &str, key_hex: &str) -> Result<String, EncryptionError> {
    let key = parse_key(key_hex)?;
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| EncryptionError::InvalidKey)?;

    // Generate a random 12-byte nonce
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| EncryptionError::EncryptionFailed)?;

    // Prepend nonce to ciphertext and base64 encode
    let mut combined = nonce_bytes.to_vec();
    combined.extend(ciphertext);

    Ok(BASE64.encode(combined))
}

/// Decrypts a base64-encoded ciphertext that was encrypted with `encrypt()`.
///
/// Fails when the ciphertext is malformed, was produced under a different
/// key, or fails GCM integrity verification.
pub fn decrypt(ciphertext_b64: &str, key_hex: &str) -> Result<String, EncryptionError> {
    let key = parse_key(key_hex)?;
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| EncryptionError::InvalidKey)?;

    let combined = BASE64.decode(ciphertext_b64)?;

    // Split nonce and ciphertext
    if combined.len() < NONCE_SIZE {
        return Err(EncryptionError::CiphertextTooShort);
    }

    let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    let plaintext_bytes = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| EncryptionError::DecryptionFailed)?;

    String::from_utf8(plaintext_bytes).map_err(|_| EncryptionError::DecryptionFailed)
}

/// Generates a fresh random 32-byte key, hex-encoded.
///
/// Intended for development only: the key lives in process memory and a
/// restart invalidates every record encrypted under it.
pub fn generate_key() -> String {
    let mut key_bytes = [0u8; KEY_SIZE];
    rand::thread_rng().fill(&mut key_bytes);
    hex::encode(key_bytes)
}

/// Parses a hex-encoded 32-byte key
fn parse_key(key_hex: &str) -> Result<[u8; KEY_SIZE], EncryptionError> {
    let bytes = hex::decode(key_hex)?;
    if bytes.len() != KEY_SIZE {
        return Err(EncryptionError::InvalidKey);
    }
    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&bytes);
    Ok(key)
}
