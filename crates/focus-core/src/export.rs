//! CSV and JSON renderings of session history.
//!
//! Both are one-way outputs; nothing reads them back.

use crate::error::Result;
use crate::storage::Session;

/// CSV header row.
pub const CSV_HEADER: &str = "Date,Duration (min),Task,Distractions,Mood,Reflection";

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Render sessions as CSV, one quoted row per session.
pub fn sessions_to_csv(sessions: &[Session]) -> String {
    let mut lines = Vec::with_capacity(sessions.len() + 1);
    lines.push(CSV_HEADER.to_string());

    for session in sessions {
        let cells = [
            session.started_at.format("%Y-%m-%d").to_string(),
            session.duration_minutes().to_string(),
            session.task_title.clone().unwrap_or_default(),
            session.distracted_count.to_string(),
            session.mood.map(|m| m.as_str().to_string()).unwrap_or_default(),
            session.reflection.clone().unwrap_or_default(),
        ];
        let row: Vec<String> = cells.iter().map(|cell| quote(cell)).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Render sessions as pretty-printed JSON (the stored shape).
pub fn sessions_to_json(sessions: &[Session]) -> Result<String> {
    Ok(serde_json::to_string_pretty(sessions)?)
}
