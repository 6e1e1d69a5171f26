//! Error types for FocusFlow core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-facing messages and exit codes.

use thiserror::Error;

/// Result type alias for FocusFlow operations.
pub type Result<T> = std::result::Result<T, FocusError>;

/// Core error type for FocusFlow operations.
#[derive(Debug, Error)]
pub enum FocusError {
    /// The vault key could not be read, written or imported
    #[error("Cannot access secure storage: {0}")]
    KeyUnavailable(String),

    /// Ciphertext tag did not verify (corrupted or tampered blob)
    #[error("Stored data failed authentication")]
    AuthenticationFailed,

    /// Encryption failure not attributable to the stored data
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Stored text is not validly encoded
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// State machine misuse: the action is not legal from the current state
    #[error("Cannot {action} while timer is {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    /// Timer duration must be strictly positive
    #[error("Invalid duration: {0} seconds (must be greater than zero)")]
    InvalidDuration(i64),

    /// Key-value backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl From<rusqlite::Error> for FocusError {
    fn from(err: rusqlite::Error) -> Self {
        FocusError::Storage(format!("SQLite error: {}", err))
    }
}

impl FocusError {
    /// Whether this error came from misuse of the timer state machine.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            FocusError::InvalidTransition { .. } | FocusError::InvalidDuration(_)
        )
    }

    /// Whether stored data itself is unreadable (bad tag, bad encoding, bad
    /// JSON), as opposed to the backend or key being temporarily unavailable.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(
            self,
            FocusError::AuthenticationFailed
                | FocusError::DecodeError(_)
                | FocusError::Serialization { .. }
        )
    }
}
