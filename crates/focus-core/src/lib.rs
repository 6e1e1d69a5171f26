//! # Focus Core
//!
//! Core library for FocusFlow, a personal focus timer whose history is
//! encrypted at rest and whose running timer survives process restarts.
//!
//! ## Architecture
//!
//! - **crypto**: Cipher Vault (AES-256-GCM key management, seal/open)
//! - **storage**: key-value backends and the typed Session & Timer Store
//! - **timer**: wall-clock timer state machine and the countdown ticker
//! - **export**: CSV and JSON renderings of session history
//!
//! Data flows one way on write (timer → store → vault → backend) and back
//! on read; the timer recomputes remaining time from the persisted snapshot
//! and the current wall clock rather than from a live counter.

pub mod clock;
pub mod crypto;
pub mod error;
pub mod export;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use crypto::CipherVault;
pub use error::{FocusError, Result};
pub use storage::{KeyValueStore, MemoryStore, SessionStore, SqliteStore};
pub use timer::{TimerMachine, TimerStatus};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
