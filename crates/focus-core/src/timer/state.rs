//! Pure timer arithmetic and snapshot transitions.
//!
//! Nothing here touches storage or the clock; every function takes `now`
//! explicitly and returns a new snapshot, leaving the input untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FocusError, Result};
use crate::storage::TimerSnapshot;

/// Logical timer state derived from the persisted snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

impl TimerStatus {
    pub fn of(snapshot: Option<&TimerSnapshot>) -> Self {
        match snapshot {
            None => TimerStatus::Idle,
            Some(s) if s.is_running => TimerStatus::Running,
            Some(s) if s.is_paused => TimerStatus::Paused,
            Some(_) => TimerStatus::Completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Completed => "completed",
        }
    }

    /// Whether a session is in progress (counting down or on hold).
    pub fn is_active(&self) -> bool {
        matches!(self, TimerStatus::Running | TimerStatus::Paused)
    }
}

impl std::fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole seconds between two instants, floored; never negative.
pub fn elapsed_secs(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (now - since).num_milliseconds();
    millis.max(0).div_euclid(1000)
}

/// Seconds left on the timer at `now`, floored at zero.
pub fn compute_remaining(snapshot: &TimerSnapshot, now: DateTime<Utc>) -> i64 {
    let remaining = if snapshot.is_running {
        snapshot.duration - snapshot.elapsed_when_paused - elapsed_secs(snapshot.start_time, now)
    } else {
        snapshot.duration - snapshot.elapsed_when_paused
    };
    remaining.max(0)
}

fn invalid(from: TimerStatus, action: &'static str) -> FocusError {
    FocusError::InvalidTransition {
        from: from.as_str(),
        action,
    }
}

/// Snapshot for a freshly started timer.
pub fn started(
    duration: i64,
    session_id: Uuid,
    task_title: Option<String>,
    now: DateTime<Utc>,
) -> Result<TimerSnapshot> {
    if duration <= 0 {
        return Err(FocusError::InvalidDuration(duration));
    }
    Ok(TimerSnapshot {
        is_running: true,
        is_paused: false,
        current_session_id: Some(session_id),
        start_time: now,
        paused_time: None,
        duration,
        elapsed_when_paused: 0,
        task_title,
    })
}

/// Fold the current running interval into `elapsed_when_paused` and hold.
pub fn paused(snapshot: &TimerSnapshot, now: DateTime<Utc>) -> Result<TimerSnapshot> {
    let status = TimerStatus::of(Some(snapshot));
    if status != TimerStatus::Running {
        return Err(invalid(status, "pause"));
    }
    let elapsed = snapshot.elapsed_when_paused + elapsed_secs(snapshot.start_time, now);
    Ok(TimerSnapshot {
        is_running: false,
        is_paused: true,
        paused_time: Some(now),
        elapsed_when_paused: elapsed.min(snapshot.duration),
        ..snapshot.clone()
    })
}

/// Start a new running interval; accumulated time carries forward.
pub fn resumed(snapshot: &TimerSnapshot, now: DateTime<Utc>) -> Result<TimerSnapshot> {
    let status = TimerStatus::of(Some(snapshot));
    if status != TimerStatus::Paused {
        return Err(invalid(status, "resume"));
    }
    Ok(TimerSnapshot {
        is_running: true,
        is_paused: false,
        start_time: now,
        paused_time: None,
        ..snapshot.clone()
    })
}

/// Mark a running timer whose countdown has reached zero as completed.
pub fn completed(snapshot: &TimerSnapshot, now: DateTime<Utc>) -> Result<TimerSnapshot> {
    let status = TimerStatus::of(Some(snapshot));
    if status != TimerStatus::Running || compute_remaining(snapshot, now) > 0 {
        return Err(invalid(status, "complete"));
    }
    Ok(TimerSnapshot {
        is_running: false,
        is_paused: false,
        paused_time: Some(now),
        elapsed_when_paused: snapshot.duration,
        ..snapshot.clone()
    })
}
