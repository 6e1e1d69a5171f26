//! Timer State Machine.
//!
//! Remaining time is always recomputed from the persisted snapshot and the
//! current wall clock:
//!
//! ```text
//! paused:   duration - elapsedWhenPaused
//! running:  duration - elapsedWhenPaused - (now - startTime)
//! ```
//!
//! floored at zero. `startTime` and `elapsedWhenPaused` are the only state
//! needed to resume correctly after a process restart.

pub mod machine;
pub mod notify;
pub mod state;
pub mod ticker;

pub use machine::TimerMachine;
pub use notify::{CompletionNotifier, LogNotifier, TimerCompleted};
pub use state::{compute_remaining, elapsed_secs, TimerStatus};
pub use ticker::{TickEvent, Ticker};
