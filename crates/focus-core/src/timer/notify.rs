//! Completion signal for the external notification collaborator.

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted once when a running countdown reaches zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerCompleted {
    pub session_id: Uuid,
    pub duration_secs: i64,
    pub completed_at: DateTime<Utc>,
    pub task_title: Option<String>,
}

/// Receives completion signals.
pub trait CompletionNotifier: Send + Sync {
    fn notify(&self, event: &TimerCompleted);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl CompletionNotifier for LogNotifier {
    fn notify(&self, event: &TimerCompleted) {
        info!(
            "Session {} complete after {}s",
            event.session_id, event.duration_secs
        );
    }
}
