//! UI primitives for the FocusFlow CLI.
//!
//! - **Context**: Environment detection (TTY, width, color)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badges and owo-colors styles
//! - **Render**: Tables, headers, receipts, hints
//! - **Progress**: The `watch` countdown bar
//! - **Format**: Clock, id and date formatting

mod context;
pub mod format;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{badge, header, hint, kv, print, print_error, receipt, simple_table, Column};

pub use format::{format_clock, format_datetime, short_id, single_line, truncate};
