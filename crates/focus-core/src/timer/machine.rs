//! Timer State Machine bound to a store and a clock.

use std::sync::Arc;

use log::{debug, info, warn};
use uuid::Uuid;

use super::notify::{CompletionNotifier, LogNotifier, TimerCompleted};
use super::state::{self, compute_remaining, TimerStatus};
use crate::clock::Clock;
use crate::error::{FocusError, Result};
use crate::storage::{DistractionEvent, EventType, Mood, Session, SessionStore, TimerSnapshot};

/// Drives the timer through its states and persists each transition.
///
/// The stored snapshot is authoritative: every operation re-reads it first,
/// so a long-lived machine (the `watch` countdown) follows transitions made
/// by other processes sharing the store. The in-memory snapshot only changes
/// after the store accepted the new one, so a failed save leaves the machine
/// where it was.
pub struct TimerMachine {
    store: Arc<SessionStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn CompletionNotifier>,
    snapshot: Option<TimerSnapshot>,
}

impl TimerMachine {
    /// Idle machine; call [`TimerMachine::restore`] to pick up a persisted timer.
    pub fn new(store: Arc<SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            notifier: Arc::new(LogNotifier),
            snapshot: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn CompletionNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Load the persisted snapshot and derive the current state.
    pub fn restore(&mut self) -> Result<TimerStatus> {
        self.snapshot = self.store.load_timer_snapshot()?;
        let status = self.status();
        debug!("Restored timer as {}", status);
        Ok(status)
    }

    pub fn status(&self) -> TimerStatus {
        TimerStatus::of(self.snapshot.as_ref())
    }

    pub fn snapshot(&self) -> Option<&TimerSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.snapshot.as_ref().and_then(|s| s.current_session_id)
    }

    /// Seconds left right now; zero when idle.
    pub fn remaining(&self) -> i64 {
        self.snapshot
            .as_ref()
            .map(|s| compute_remaining(s, self.clock.now()))
            .unwrap_or(0)
    }

    /// Pick up whatever another handle on the store persisted since.
    fn sync(&mut self) -> Result<()> {
        self.snapshot = self.store.load_timer_snapshot()?;
        Ok(())
    }

    fn commit(&mut self, next: TimerSnapshot) -> Result<()> {
        self.store.save_timer_snapshot(&next)?;
        self.snapshot = Some(next);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.store.clear_timer_snapshot()?;
        self.snapshot = None;
        Ok(())
    }

    fn require(&self, allowed: &[TimerStatus], action: &'static str) -> Result<()> {
        let status = self.status();
        if allowed.contains(&status) {
            Ok(())
        } else {
            Err(FocusError::InvalidTransition {
                from: status.as_str(),
                action,
            })
        }
    }

    /// Start a countdown of `duration` seconds.
    pub fn start(&mut self, duration: i64, session_id: Option<Uuid>) -> Result<Uuid> {
        self.start_task(duration, session_id, None)
    }

    /// Start a countdown labelled with a task title.
    pub fn start_task(
        &mut self,
        duration: i64,
        session_id: Option<Uuid>,
        task_title: Option<String>,
    ) -> Result<Uuid> {
        self.sync()?;
        self.require(&[TimerStatus::Idle], "start")?;
        let session_id = session_id.unwrap_or_else(Uuid::new_v4);
        let next = state::started(duration, session_id, task_title, self.clock.now())?;
        self.commit(next)?;
        info!("Started {}s session {}", duration, session_id);
        Ok(session_id)
    }

    /// Pause a running countdown.
    ///
    /// Reconciles with the wall clock first: a countdown that already ran out
    /// is recorded as `Completed` (and announced) before the pause is
    /// rejected, since pausing cannot give back time that has elapsed.
    pub fn pause(&mut self) -> Result<()> {
        self.poll()?;
        let current = self.current("pause")?;
        let next = state::paused(&current, self.clock.now())?;
        self.commit(next)?;
        debug!("Paused with {}s remaining", self.remaining());
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.sync()?;
        let current = self.current("resume")?;
        let next = state::resumed(&current, self.clock.now())?;
        self.commit(next)?;
        debug!("Resumed with {}s remaining", self.remaining());
        Ok(())
    }

    fn current(&self, action: &'static str) -> Result<TimerSnapshot> {
        self.snapshot.clone().ok_or(FocusError::InvalidTransition {
            from: TimerStatus::Idle.as_str(),
            action,
        })
    }

    /// Move a running timer that has reached zero to `Completed` and signal it.
    pub fn complete(&mut self) -> Result<TimerCompleted> {
        self.sync()?;
        self.complete_current()
    }

    fn complete_current(&mut self) -> Result<TimerCompleted> {
        let current = self.current("complete")?;
        let now = self.clock.now();
        let next = state::completed(&current, now)?;
        let event = TimerCompleted {
            session_id: next.current_session_id.unwrap_or_else(Uuid::new_v4),
            duration_secs: next.duration,
            completed_at: now,
            task_title: next.task_title.clone(),
        };
        self.commit(next)?;
        self.notifier.notify(&event);
        Ok(event)
    }

    /// Reconcile with the store and the wall clock, completing the timer if
    /// it ran out.
    pub fn poll(&mut self) -> Result<Option<TimerCompleted>> {
        self.sync()?;
        if self.status() == TimerStatus::Running && self.remaining() == 0 {
            return self.complete_current().map(Some);
        }
        Ok(None)
    }

    /// Log a distraction against the active session.
    ///
    /// Like [`TimerMachine::pause`], an expired countdown is completed first
    /// and the distraction is then rejected.
    pub fn record_distraction(&mut self, event_type: EventType) -> Result<DistractionEvent> {
        self.poll()?;
        self.require(&[TimerStatus::Running, TimerStatus::Paused], "record a distraction")?;
        let session_id = self.session_id().unwrap_or_else(Uuid::new_v4);

        let event = DistractionEvent {
            id: Uuid::new_v4(),
            session_id,
            timestamp: self.clock.now(),
            event_type,
        };

        let mut events = self.store.events_for_update()?;
        events.push(event.clone());
        self.store.save_events(&events)?;
        debug!("Logged {} distraction for {}", event_type.as_str(), session_id);
        Ok(event)
    }

    /// Record the session and return to `Idle`.
    ///
    /// If the session list cannot be saved, or the snapshot cannot be cleared
    /// afterwards, the snapshot is kept so the caller can retry; a retry does
    /// not record the session twice. Unreadable history is replaced only when
    /// the stored blob is corrupt, never on a transient read error.
    pub fn finalize(&mut self, reflection: Option<String>, mood: Option<Mood>) -> Result<Session> {
        self.poll()?;
        self.require(
            &[TimerStatus::Running, TimerStatus::Paused, TimerStatus::Completed],
            "finish",
        )?;
        let snapshot = self.current("finish")?;
        let now = self.clock.now();

        let remaining = compute_remaining(&snapshot, now);
        let duration_sec = snapshot.duration - remaining;
        let id = snapshot.current_session_id.unwrap_or_else(Uuid::new_v4);

        let events = self.store.events_for_update()?;
        let distracted_count = events
            .iter()
            .filter(|event| event.session_id == id)
            .count() as u32;

        let session = Session {
            id,
            started_at: now - chrono::Duration::seconds(duration_sec),
            ended_at: Some(now),
            duration_sec: Some(duration_sec),
            task_title: snapshot.task_title.clone(),
            distracted_count,
            reflection: reflection.filter(|text| !text.trim().is_empty()),
            mood,
        };

        let mut sessions = self.store.sessions_for_update()?;
        // A retry after a failed clear must not record the session twice.
        let session = match sessions.iter().find(|stored| stored.id == id) {
            Some(stored) => {
                warn!("Session {} was already recorded", id);
                stored.clone()
            }
            None => {
                sessions.push(session.clone());
                self.store.save_sessions(&sessions)?;
                info!("Recorded session {} ({}s)", id, duration_sec);
                session
            }
        };

        self.clear()?;
        Ok(session)
    }

    /// Drop the timer without recording a session.
    pub fn discard(&mut self) -> Result<()> {
        self.poll()?;
        self.require(&[TimerStatus::Idle, TimerStatus::Completed], "discard")?;
        self.clear()?;
        debug!("Discarded timer snapshot");
        Ok(())
    }
}

impl std::fmt::Debug for TimerMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerMachine")
            .field("status", &self.status())
            .field("snapshot", &self.snapshot)
            .finish()
    }
}
