//! Constants used throughout the CLI.

use std::time::Duration;

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Nothing to act on (no config, no active timer).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input, or an action not legal in the current timer state.
    pub const INVALID_INPUT: i32 = 4;

    /// The encryption key or store could not be used.
    pub const SECURE_STORAGE: i32 = 5;
}

/// Session lengths offered by `focus start --preset`, in minutes.
pub const DEFAULT_PRESETS: [u32; 3] = [25, 50, 90];

/// Session length when nothing else is given, in minutes.
pub const DEFAULT_MINUTES: u32 = 25;

/// Refresh interval of `focus watch`.
pub const WATCH_TICK: Duration = Duration::from_millis(500);
