//! JSON shapes for `--json` output.

use serde_json::{json, Value};

use focus_core::storage::{Session, TimerSnapshot};
use focus_core::TimerStatus;

/// Timer status as printed by `focus status --json`.
pub fn status_json(status: TimerStatus, snapshot: Option<&TimerSnapshot>, remaining: i64) -> Value {
    match snapshot {
        Some(snapshot) => json!({
            "status": status.as_str(),
            "sessionId": snapshot.current_session_id,
            "taskTitle": snapshot.task_title,
            "durationSec": snapshot.duration,
            "remainingSec": remaining,
            "startTime": snapshot.start_time.to_rfc3339(),
            "pausedTime": snapshot.paused_time.map(|t| t.to_rfc3339()),
        }),
        None => json!({
            "status": status.as_str(),
            "sessionId": Value::Null,
            "remainingSec": 0,
        }),
    }
}

/// History listing with its load diagnostic.
pub fn history_json(sessions: &[Session], diagnostic: Option<&str>) -> Value {
    json!({
        "sessions": sessions,
        "count": sessions.len(),
        "warning": diagnostic,
    })
}
