//! Vault key material and its JWK-style export format.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{FocusError, Result};

/// Length of the symmetric key in bytes (256 bits).
pub const KEY_LENGTH: usize = 32;

const KEY_TYPE: &str = "oct";
const KEY_ALGORITHM: &str = "A256GCM";

/// A 256-bit AES-GCM key.
///
/// Key bytes are zeroized when the value is dropped and never appear in
/// `Debug` output.
#[derive(Clone, ZeroizeOnDrop)]
pub struct VaultKey {
    key: [u8; KEY_LENGTH],
}

/// Exported key material as persisted next to the ciphertext.
#[derive(Debug, Serialize, Deserialize)]
struct ExportedKey {
    kty: String,
    #[serde(default)]
    alg: Option<String>,
    k: String,
    #[serde(default)]
    ext: bool,
    #[serde(default)]
    key_ops: Vec<String>,
}

impl VaultKey {
    /// Generate a fresh key from the operating system's CSPRNG.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; KEY_LENGTH];
        getrandom::getrandom(&mut bytes).map_err(|e| {
            FocusError::KeyUnavailable(format!("Failed to generate key bytes: {}", e))
        })?;
        Ok(Self { key: bytes })
    }

    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Raw key bytes. Use only for immediate cipher construction.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Export the key as JWK-style JSON text.
    pub fn export(&self) -> Result<String> {
        let exported = ExportedKey {
            kty: KEY_TYPE.to_string(),
            alg: Some(KEY_ALGORITHM.to_string()),
            k: URL_SAFE_NO_PAD.encode(self.key),
            ext: true,
            key_ops: vec!["encrypt".to_string(), "decrypt".to_string()],
        };
        Ok(serde_json::to_string(&exported)?)
    }

    /// Import a key previously produced by [`VaultKey::export`].
    ///
    /// Any malformed export is reported as `KeyUnavailable`: the stored key is
    /// the only way to read existing history, so callers must not silently
    /// replace it.
    pub fn import(exported: &str) -> Result<Self> {
        let parsed: ExportedKey = serde_json::from_str(exported).map_err(|e| {
            FocusError::KeyUnavailable(format!("Stored key is not valid JSON: {}", e))
        })?;

        if parsed.kty != KEY_TYPE {
            return Err(FocusError::KeyUnavailable(format!(
                "Unsupported key type: {}",
                parsed.kty
            )));
        }
        if let Some(alg) = parsed.alg.as_deref() {
            if alg != KEY_ALGORITHM {
                return Err(FocusError::KeyUnavailable(format!(
                    "Unsupported key algorithm: {}",
                    alg
                )));
            }
        }

        let mut decoded = URL_SAFE_NO_PAD
            .decode(parsed.k.trim_end_matches('='))
            .map_err(|e| {
                FocusError::KeyUnavailable(format!("Stored key is not base64url: {}", e))
            })?;
        if decoded.len() != KEY_LENGTH {
            let len = decoded.len();
            decoded.zeroize();
            return Err(FocusError::KeyUnavailable(format!(
                "Stored key must be {} bytes (got {})",
                KEY_LENGTH, len
            )));
        }

        let mut bytes = [0u8; KEY_LENGTH];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self::from_bytes(bytes))
    }

    /// Short, non-secret identifier for the key (hex of a BLAKE3 prefix).
    pub fn fingerprint(&self) -> String {
        let hash = blake3::hash(&self.key);
        hash.to_hex()[..16].to_string()
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_produces_distinct_keys() {
        let key1 = VaultKey::generate().unwrap();
        let key2 = VaultKey::generate().unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_export_import_preserves_key() {
        let key = VaultKey::generate().unwrap();
        let exported = key.export().unwrap();
        let imported = VaultKey::import(&exported).unwrap();
        assert_eq!(key.as_bytes(), imported.as_bytes());
    }

    #[test]
    fn test_export_is_jwk_shaped() {
        let key = VaultKey::from_bytes([7u8; KEY_LENGTH]);
        let exported: serde_json::Value = serde_json::from_str(&key.export().unwrap()).unwrap();
        assert_eq!(exported["kty"], "oct");
        assert_eq!(exported["alg"], "A256GCM");
        assert_eq!(exported["ext"], true);
        assert_eq!(exported["k"].as_str().unwrap().len(), 43);
    }

    #[test]
    fn test_import_accepts_browser_style_export() {
        let jwk = r#"{"alg":"A256GCM","ext":true,"k":"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA","key_ops":["encrypt","decrypt"],"kty":"oct"}"#;
        let key = VaultKey::import(jwk).unwrap();
        assert_eq!(key.as_bytes(), &[0u8; KEY_LENGTH]);
    }

    #[test]
    fn test_import_rejects_wrong_length() {
        let jwk = r#"{"kty":"oct","k":"AAAA"}"#;
        let result = VaultKey::import(jwk);
        assert!(matches!(result, Err(FocusError::KeyUnavailable(_))));
    }

    #[test]
    fn test_import_rejects_wrong_type() {
        let jwk = r#"{"kty":"RSA","k":"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"}"#;
        let result = VaultKey::import(jwk);
        assert!(result.unwrap_err().to_string().contains("Unsupported key type"));
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(
            VaultKey::import("not json"),
            Err(FocusError::KeyUnavailable(_))
        ));
    }

    #[test]
    fn test_debug_redacts() {
        let key = VaultKey::generate().unwrap();
        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let key = VaultKey::from_bytes([1u8; KEY_LENGTH]);
        assert_eq!(key.fingerprint(), key.clone().fingerprint());
        assert_eq!(key.fingerprint().len(), 16);
    }
}
