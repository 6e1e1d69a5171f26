//! `focus watch`: live countdown until the running session completes.

use std::sync::Arc;

use tokio::sync::Mutex;

use focus_core::timer::{TickEvent, Ticker};
use focus_core::TimerStatus;

use crate::app::AppContext;
use crate::constants::WATCH_TICK;
use crate::errors::CliError;
use crate::ui::progress::CountdownBar;
use crate::ui::{badge, format_clock, hint, print, receipt, Badge, UiContext};

pub fn handle_watch(ctx: &AppContext) -> anyhow::Result<()> {
    let mut machine = ctx.machine()?;
    machine.poll()?;
    let ui_ctx = ctx.ui_context(false);

    match machine.status() {
        TimerStatus::Idle => {
            return Err(
                CliError::not_found("No active session to watch", "Run `focus start` first.")
                    .into(),
            )
        }
        TimerStatus::Paused => {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "Timer is paused"));
            print(&ui_ctx, &hint(&ui_ctx, "focus resume"));
            return Ok(());
        }
        TimerStatus::Completed => {
            print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "Session already complete"));
            print(&ui_ctx, &hint(&ui_ctx, "focus finish"));
            return Ok(());
        }
        TimerStatus::Running => {}
    }

    let (total, label) = match machine.snapshot() {
        Some(snapshot) => (
            snapshot.duration,
            snapshot
                .task_title
                .clone()
                .unwrap_or_else(|| "Focus".to_string()),
        ),
        None => (0, "Focus".to_string()),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch_until_done(&ui_ctx, machine, total, &label))
}

async fn watch_until_done(
    ui_ctx: &UiContext,
    machine: focus_core::TimerMachine,
    total: i64,
    label: &str,
) -> anyhow::Result<()> {
    let mut bar = CountdownBar::new(ui_ctx, total, label);
    bar.update(machine.remaining());

    let shared = Arc::new(Mutex::new(machine));
    let (mut ticker, mut rx) = Ticker::spawn(shared, WATCH_TICK);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(TickEvent::Tick { remaining_secs }) => bar.update(remaining_secs),
                Some(TickEvent::Completed(done)) => {
                    bar.finish();
                    print(
                        ui_ctx,
                        &receipt(
                            ui_ctx,
                            "Session complete",
                            &[("Length", format_clock(done.duration_secs))],
                        ),
                    );
                    print(ui_ctx, &hint(ui_ctx, "focus finish --mood productive"));
                    break;
                }
                Some(TickEvent::Stopped) | None => {
                    bar.finish();
                    print(ui_ctx, &badge(ui_ctx, Badge::Warn, "Timer stopped"));
                    break;
                }
            },
            _ = &mut ctrl_c => {
                ticker.cancel();
                bar.finish();
                let stopped = "Stopped watching; the timer keeps running";
                print(ui_ctx, &badge(ui_ctx, Badge::Info, stopped));
                break;
            }
        }
    }
    Ok(())
}
