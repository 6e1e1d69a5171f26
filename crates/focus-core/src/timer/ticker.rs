//! Cancellable countdown ticker.
//!
//! The ticker never counts down on its own: each tick calls
//! [`TimerMachine::poll`] and reports whatever the wall clock says is left.
//! Missed ticks are skipped, so a suspended process catches up in one step.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::machine::TimerMachine;
use super::notify::TimerCompleted;
use super::state::TimerStatus;

/// Events reported by a running ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    Tick { remaining_secs: i64 },
    Completed(TimerCompleted),
    /// The timer is no longer running (paused, finished elsewhere, or failed)
    Stopped,
}

/// Handle to the background tick task. Dropping it stops the task.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a tick task for `machine` on the current tokio runtime.
    pub fn spawn(
        machine: Arc<Mutex<TimerMachine>>,
        interval: Duration,
    ) -> (Self, UnboundedReceiver<TickEvent>) {
        let mut ticker = Self::default();
        let rx = ticker.restart(machine, interval);
        (ticker, rx)
    }

    /// Replace the current task with a fresh one; at most one is outstanding.
    pub fn restart(
        &mut self,
        machine: Arc<Mutex<TimerMachine>>,
        interval: Duration,
    ) -> UnboundedReceiver<TickEvent> {
        self.cancel();
        let (tx, rx) = mpsc::unbounded_channel();
        self.handle = Some(tokio::spawn(run(machine, interval, tx)));
        rx
    }

    /// Abort the tick task if one is running.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Ticker cancelled");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(true)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run(
    machine: Arc<Mutex<TimerMachine>>,
    interval: Duration,
    tx: UnboundedSender<TickEvent>,
) {
    let mut interval = time::interval(interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let event = {
            let mut guard = machine.lock().await;
            match guard.poll() {
                Ok(Some(done)) => TickEvent::Completed(done),
                Ok(None) if guard.status() == TimerStatus::Running => TickEvent::Tick {
                    remaining_secs: guard.remaining(),
                },
                Ok(None) => TickEvent::Stopped,
                Err(e) => {
                    warn!("Ticker stopped: {}", e);
                    TickEvent::Stopped
                }
            }
        };

        let finished = !matches!(event, TickEvent::Tick { .. });
        if tx.send(event).is_err() || finished {
            break;
        }
    }
}
