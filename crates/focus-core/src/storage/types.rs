//! Core data types for the storage layer.
//!
//! Field names serialize in camelCase; these are the persisted shapes of the
//! `sessions`, `events` and `timer_state` entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a finished session felt, as reported during reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Productive,
    Distracted,
    Mixed,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Productive => "productive",
            Mood::Distracted => "distracted",
            Mood::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "productive" => Ok(Mood::Productive),
            "distracted" => Ok(Mood::Distracted),
            "mixed" => Ok(Mood::Mixed),
            other => Err(format!(
                "unknown mood '{}' (expected productive, distracted or mixed)",
                other
            )),
        }
    }
}

/// A completed focus session. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique identifier for this session
    pub id: Uuid,

    pub started_at: DateTime<Utc>,

    pub ended_at: Option<DateTime<Utc>>,

    /// Focused seconds (planned duration minus time left at stop)
    pub duration_sec: Option<i64>,

    pub task_title: Option<String>,

    /// Distraction events logged against this session
    pub distracted_count: u32,

    pub reflection: Option<String>,

    pub mood: Option<Mood>,
}

impl Session {
    /// Whole minutes, rounded to nearest; 0 when the duration is unknown.
    pub fn duration_minutes(&self) -> i64 {
        match self.duration_sec {
            Some(secs) => (secs as f64 / 60.0).round() as i64,
            None => 0,
        }
    }
}

/// Source of a distraction signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Manual,
    TabSwitch,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Manual => "manual",
            EventType::TabSwitch => "tab_switch",
        }
    }
}

/// Append-only distraction log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistractionEvent {
    pub id: Uuid,

    /// Weak reference to the session; not enforced
    pub session_id: Uuid,

    pub timestamp: DateTime<Utc>,

    pub event_type: EventType,
}

/// Persisted description of the in-progress timer.
///
/// `is_running` and `is_paused` are never both true. Both false means the
/// countdown reached zero and the session awaits finalize; `paused_time` then
/// holds the completion instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub is_running: bool,
    pub is_paused: bool,
    pub current_session_id: Option<Uuid>,

    /// Most recent start or resume (epoch milliseconds on disk)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,

    /// Most recent pause (epoch milliseconds on disk)
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub paused_time: Option<DateTime<Utc>>,

    /// Planned length in seconds
    pub duration: i64,

    /// Seconds counted before the current running interval
    pub elapsed_when_paused: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_title: Option<String>,
}

impl TimerSnapshot {
    /// Whether the running/paused flags are mutually exclusive and the
    /// counters are sane.
    pub fn is_consistent(&self) -> bool {
        !(self.is_running && self.is_paused)
            && self.duration > 0
            && self.elapsed_when_paused >= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_wire_shape() {
        let snapshot = TimerSnapshot {
            is_running: true,
            is_paused: false,
            current_session_id: None,
            start_time: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
            paused_time: None,
            duration: 1500,
            elapsed_when_paused: 0,
            task_title: None,
        };

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["isRunning"], true);
        assert_eq!(value["startTime"], 1_700_000_000_123i64);
        assert!(value["pausedTime"].is_null());
        assert_eq!(value["elapsedWhenPaused"], 0);
        assert!(value.get("taskTitle").is_none());
    }

    #[test]
    fn test_snapshot_accepts_missing_task_title() {
        let json = r#"{"isRunning":false,"isPaused":true,"currentSessionId":null,
            "startTime":1700000000000,"pausedTime":1700000300000,
            "duration":1500,"elapsedWhenPaused":300}"#;
        let snapshot: TimerSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.is_paused);
        assert_eq!(snapshot.task_title, None);
        assert!(snapshot.is_consistent());
    }

    #[test]
    fn test_both_flags_true_is_inconsistent() {
        let json = r#"{"isRunning":true,"isPaused":true,"currentSessionId":null,
            "startTime":0,"pausedTime":null,"duration":60,"elapsedWhenPaused":0}"#;
        let snapshot: TimerSnapshot = serde_json::from_str(json).unwrap();
        assert!(!snapshot.is_consistent());
    }

    #[test]
    fn test_mood_and_event_type_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&Mood::Productive).unwrap(), "\"productive\"");
        assert_eq!(
            serde_json::to_string(&EventType::TabSwitch).unwrap(),
            "\"tab_switch\""
        );
        assert_eq!("Mixed".parse::<Mood>().unwrap(), Mood::Mixed);
        assert!("sleepy".parse::<Mood>().is_err());
    }

    #[test]
    fn test_duration_minutes_rounds() {
        let session = Session {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            ended_at: None,
            duration_sec: Some(1530),
            task_title: None,
            distracted_count: 0,
            reflection: None,
            mood: None,
        };
        assert_eq!(session.duration_minutes(), 26);
        assert_eq!(
            Session {
                duration_sec: None,
                ..session
            }
            .duration_minutes(),
            0
        );
    }
}
