//! AES-256-GCM seal/open over text-encoded payloads.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::key::VaultKey;
use crate::error::{FocusError, Result};

/// Nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

fn cipher_for(key: &VaultKey) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| FocusError::KeyUnavailable(format!("Failed to create cipher: {}", e)))
}

fn generate_nonce() -> Result<[u8; NONCE_LEN]> {
    let mut nonce = [0u8; NONCE_LEN];
    getrandom::getrandom(&mut nonce)
        .map_err(|e| FocusError::Crypto(format!("Failed to generate nonce: {}", e)))?;
    Ok(nonce)
}

/// Encrypt `plaintext` and return `base64(nonce || ciphertext || tag)`.
///
/// A fresh random nonce is drawn on every call.
pub fn seal(plaintext: &[u8], key: &VaultKey) -> Result<String> {
    let cipher = cipher_for(key)?;
    let nonce_bytes = generate_nonce()?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| FocusError::Crypto(format!("Encryption failed: {}", e)))?;

    let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    combined.extend_from_slice(&nonce_bytes);
    combined.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(combined))
}

/// Decode and decrypt a payload produced by [`seal`].
///
/// # Errors
///
/// - `DecodeError` if the text is not base64 or too short to hold a nonce and tag
/// - `AuthenticationFailed` if the tag does not verify
pub fn open(encoded: &str, key: &VaultKey) -> Result<Vec<u8>> {
    let combined = BASE64
        .decode(encoded.trim())
        .map_err(|e| FocusError::DecodeError(format!("Invalid base64 payload: {}", e)))?;

    if combined.len() < NONCE_LEN + TAG_LEN {
        return Err(FocusError::DecodeError(format!(
            "Sealed payload too short ({} bytes)",
            combined.len()
        )));
    }

    let (nonce, ciphertext) = combined.split_at(NONCE_LEN);
    let cipher = cipher_for(key)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| FocusError::AuthenticationFailed)
}
