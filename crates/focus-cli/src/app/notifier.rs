//! Terminal completion notifications.

use focus_core::timer::{CompletionNotifier, TimerCompleted};
use log::info;

use crate::ui::format::format_clock;

/// Rings the terminal bell and prints a completion line to stderr.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    pub enabled: bool,
    pub quiet: bool,
}

impl CompletionNotifier for TerminalNotifier {
    fn notify(&self, event: &TimerCompleted) {
        info!("Session {} completed", event.session_id);
        if !self.enabled || self.quiet {
            return;
        }
        let label = event
            .task_title
            .as_deref()
            .map(|title| format!(" ({})", title))
            .unwrap_or_default();
        eprintln!(
            "\x07Timer complete{} after {}. Run `focus finish` to reflect.",
            label,
            format_clock(event.duration_secs)
        );
    }
}
