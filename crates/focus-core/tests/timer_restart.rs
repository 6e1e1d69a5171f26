use std::sync::Arc;

use chrono::{TimeZone, Utc};

use focus_core::storage::{EventType, MemoryStore, Mood, SessionStore, TimerSnapshot};
use focus_core::timer::compute_remaining;
use focus_core::{Clock, KeyValueStore, ManualClock, TimerMachine, TimerStatus};

struct Profile {
    backend: Arc<MemoryStore>,
    store: Arc<SessionStore>,
    clock: Arc<ManualClock>,
}

impl Profile {
    fn new() -> Self {
        let backend = Arc::new(MemoryStore::new());
        let store = Arc::new(SessionStore::new(backend.clone()));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 9, 2, 7, 45, 0).unwrap(),
        ));
        Self {
            backend,
            store,
            clock,
        }
    }

    /// A new machine as a freshly launched process would build it.
    fn launch(&self) -> TimerMachine {
        let mut machine = TimerMachine::new(self.store.clone(), self.clock.clone());
        machine.restore().expect("restore should succeed");
        machine
    }
}

#[test]
fn test_pause_resume_scenario_without_restart() {
    let profile = Profile::new();
    let mut machine = profile.launch();

    machine.start(1500, None).unwrap();
    profile.clock.advance_secs(300);
    machine.pause().unwrap();
    profile.clock.advance_secs(120);
    machine.resume().unwrap();
    profile.clock.advance_secs(600);

    assert_eq!(machine.remaining(), 600);
}

#[test]
fn test_pause_resume_scenario_with_restart_after_resume() {
    let profile = Profile::new();
    {
        let mut machine = profile.launch();
        machine.start(1500, None).unwrap();
        profile.clock.advance_secs(300);
        machine.pause().unwrap();
        profile.clock.advance_secs(120);
        machine.resume().unwrap();
    }

    profile.clock.advance_secs(600);
    let machine = profile.launch();
    assert_eq!(machine.status(), TimerStatus::Running);
    assert_eq!(machine.remaining(), 600);
}

#[test]
fn test_remaining_is_never_negative() {
    let profile = Profile::new();
    let mut machine = profile.launch();
    machine.start(60, None).unwrap();

    for _ in 0..5 {
        profile.clock.advance_secs(45);
        let snapshot: &TimerSnapshot = machine.snapshot().unwrap();
        assert!(compute_remaining(snapshot, profile.clock.now()) >= 0);
    }
    assert_eq!(machine.remaining(), 0);
}

#[test]
fn test_clear_is_idempotent() {
    let profile = Profile::new();
    let mut machine = profile.launch();
    machine.start(60, None).unwrap();

    profile.store.clear_timer_snapshot().unwrap();
    profile.store.clear_timer_snapshot().unwrap();
    assert!(profile.store.load_timer_snapshot().unwrap().is_none());
}

#[test]
fn test_first_run_is_empty_and_quiet() {
    let profile = Profile::new();
    let machine = profile.launch();

    assert_eq!(machine.status(), TimerStatus::Idle);
    let loaded = profile.store.load_sessions();
    assert!(loaded.value.is_empty());
    assert!(loaded.diagnostic.is_none());
    assert!(profile.backend.is_empty());
}

#[test]
fn test_three_distractions_counted_on_finalize() {
    let profile = Profile::new();
    let mut machine = profile.launch();
    let session_id = machine.start(1500, None).unwrap();

    for step in 0..3 {
        profile.clock.advance_secs(100);
        // Restart between signals; the session id lives in the snapshot.
        if step == 1 {
            machine = profile.launch();
        }
        machine.record_distraction(EventType::Manual).unwrap();
    }

    let session = machine
        .finalize(Some("phone kept buzzing".into()), Some(Mood::Distracted))
        .unwrap();
    assert_eq!(session.id, session_id);
    assert_eq!(session.distracted_count, 3);
    assert_eq!(session.duration_sec, Some(300));

    let events = profile.store.load_events().value;
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|event| event.session_id == session_id));
}

#[test]
fn test_completion_survives_restart_and_finalizes_full_length() {
    let profile = Profile::new();
    {
        let mut machine = profile.launch();
        machine
            .start_task(1500, None, Some("write tests".into()))
            .unwrap();
    }

    profile.clock.advance_secs(4000);
    let mut machine = profile.launch();
    assert_eq!(machine.status(), TimerStatus::Running);
    assert!(machine.poll().unwrap().is_some());
    assert_eq!(machine.status(), TimerStatus::Completed);

    let machine_after_restart = profile.launch();
    assert_eq!(machine_after_restart.status(), TimerStatus::Completed);

    let session = machine.finalize(None, Some(Mood::Productive)).unwrap();
    assert_eq!(session.duration_sec, Some(1500));
    assert_eq!(session.task_title.as_deref(), Some("write tests"));
    assert_eq!(profile.store.load_sessions().value.len(), 1);
}

#[test]
fn test_erase_all_resets_profile() {
    let profile = Profile::new();
    let mut machine = profile.launch();
    machine.start(60, None).unwrap();
    machine.finalize(None, None).unwrap();
    profile.store.mark_onboarding_complete().unwrap();

    profile.store.erase_all().unwrap();
    assert!(profile.backend.keys("focusflow_").unwrap().is_empty());
    assert!(!profile.store.is_onboarding_complete().unwrap());
}
