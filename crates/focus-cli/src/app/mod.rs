//! Application-level utilities for the FocusFlow CLI.
//!
//! This module provides:
//! - Path resolution for config and store files
//! - The per-invocation application context
//! - Terminal completion notifications

mod context;
mod notifier;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use resolver::{missing_config_message, resolve_config_path};
