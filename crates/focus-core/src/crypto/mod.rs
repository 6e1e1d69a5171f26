//! Cipher Vault: encryption at rest for FocusFlow history.
//!
//! - **AES-256-GCM**: 256-bit key, 96-bit random nonce per seal, 128-bit tag
//! - Sealed payloads are `base64(nonce || ciphertext || tag)` so they fit a
//!   text-only key-value space
//! - The key is generated once, exported as JWK-style JSON and persisted
//!   before first use; key material is zeroized on drop
//!
//! ## Threat Model
//!
//! We defend against:
//! - Casual inspection of the data directory
//! - Exposure of exported or backed-up blobs without the key entry
//! - Silent corruption (every blob is authenticated)
//!
//! We do NOT defend against:
//! - A reader with access to the same store, which also holds the key
//! - Compromised OS / memory inspection

pub mod cipher;
pub mod key;
pub mod vault;

pub use cipher::{open, seal, NONCE_LEN, TAG_LEN};
pub use key::VaultKey;
pub use vault::{CipherVault, KEY_ENTRY};
