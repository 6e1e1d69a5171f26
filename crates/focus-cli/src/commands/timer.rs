//! Timer lifecycle commands: start, pause, resume, status, distraction,
//! finish and discard.

use dialoguer::{theme::ColorfulTheme, Input, Select};

use focus_core::storage::{EventType, Mood};
use focus_core::{TimerMachine, TimerStatus};

use crate::app::AppContext;
use crate::cli::{DistractionArgs, DistractionKind, FinishArgs, StartArgs, StatusArgs};
use crate::errors::CliError;
use crate::output::status_json;
use crate::ui::theme::{styled, styles};
use crate::ui::{badge, format_clock, header, hint, kv, print, receipt, short_id, Badge, UiContext};

fn planned_seconds(ctx: &AppContext, args: &StartArgs) -> anyhow::Result<i64> {
    if let Some(seconds) = args.seconds {
        return Ok(seconds);
    }
    if let Some(minutes) = args.minutes {
        return Ok(i64::from(minutes) * 60);
    }
    let timer = ctx.timer_config()?;
    match args.preset {
        Some(preset) if timer.presets.contains(&preset) => Ok(i64::from(preset) * 60),
        Some(preset) => {
            let offered: Vec<String> = timer.presets.iter().map(|p| p.to_string()).collect();
            Err(CliError::invalid_input(format!(
                "Unknown preset {} (available: {})",
                preset,
                offered.join(", ")
            ))
            .into())
        }
        None => Ok(i64::from(timer.default_minutes) * 60),
    }
}

pub fn handle_start(ctx: &AppContext, args: &StartArgs) -> anyhow::Result<()> {
    let duration = planned_seconds(ctx, args)?;
    let mut machine = ctx.machine()?;
    let task = args
        .task
        .as_deref()
        .map(str::trim)
        .filter(|task| !task.is_empty())
        .map(str::to_string);
    let session_id = machine.start_task(duration, None, task.clone())?;

    if ctx.quiet() {
        return Ok(());
    }
    let ui_ctx = ctx.ui_context(false);
    let mut items = vec![
        ("Session", short_id(&session_id)),
        ("Length", format_clock(duration)),
    ];
    if let Some(task) = task {
        items.push(("Task", task));
    }
    print(&ui_ctx, &receipt(&ui_ctx, "Focus session started", &items));
    print(&ui_ctx, &hint(&ui_ctx, "focus watch"));
    Ok(())
}

pub fn handle_pause(ctx: &AppContext) -> anyhow::Result<()> {
    let mut machine = ctx.machine()?;
    machine.pause()?;
    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        let left = format_clock(machine.remaining());
        print(&ui_ctx, &receipt(&ui_ctx, "Paused", &[("Time left", left)]));
    }
    Ok(())
}

pub fn handle_resume(ctx: &AppContext) -> anyhow::Result<()> {
    let mut machine = ctx.machine()?;
    machine.resume()?;
    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        let left = format_clock(machine.remaining());
        print(&ui_ctx, &receipt(&ui_ctx, "Resumed", &[("Time left", left)]));
    }
    Ok(())
}

pub fn handle_status(ctx: &AppContext, args: &StatusArgs) -> anyhow::Result<()> {
    let mut machine = ctx.machine()?;
    machine.poll()?;
    let status = machine.status();
    let ui_ctx = ctx.ui_context(args.json);

    if ui_ctx.mode.is_json() {
        let value = status_json(status, machine.snapshot(), machine.remaining());
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    print_status(&ui_ctx, &machine, status);
    Ok(())
}

fn print_status(ui_ctx: &UiContext, machine: &TimerMachine, status: TimerStatus) {
    print(ui_ctx, &header(ui_ctx, "status", Some(status.as_str())));
    let snapshot = match machine.snapshot() {
        Some(snapshot) => snapshot,
        None => {
            if ui_ctx.mode.is_pretty() {
                print(ui_ctx, &badge(ui_ctx, Badge::Info, "No active session"));
            } else {
                print(ui_ctx, &kv(ui_ctx, "Status", status.as_str()));
            }
            print(ui_ctx, &hint(ui_ctx, "focus start"));
            return;
        }
    };

    let left = format_clock(machine.remaining());
    let left = if status == TimerStatus::Running {
        styled(&left, styles::clock(), ui_ctx.color)
    } else {
        left
    };
    if !ui_ctx.mode.is_pretty() {
        print(ui_ctx, &kv(ui_ctx, "Status", status.as_str()));
    }
    if let Some(id) = &snapshot.current_session_id {
        print(ui_ctx, &kv(ui_ctx, "Session", &short_id(id)));
    }
    if let Some(task) = &snapshot.task_title {
        print(ui_ctx, &kv(ui_ctx, "Task", task));
    }
    print(ui_ctx, &kv(ui_ctx, "Time left", &left));
    print(ui_ctx, &kv(ui_ctx, "Length", &format_clock(snapshot.duration)));

    match status {
        TimerStatus::Paused => print(ui_ctx, &hint(ui_ctx, "focus resume")),
        TimerStatus::Completed => print(ui_ctx, &hint(ui_ctx, "focus finish")),
        _ => {}
    }
}

pub fn handle_distraction(ctx: &AppContext, args: &DistractionArgs) -> anyhow::Result<()> {
    let event_type = match args.kind {
        DistractionKind::Manual => EventType::Manual,
        DistractionKind::TabSwitch => EventType::TabSwitch,
    };
    let mut machine = ctx.machine()?;
    let event = machine.record_distraction(event_type)?;

    if !ctx.quiet() {
        let count = machine
            .store()
            .load_events()
            .value
            .iter()
            .filter(|logged| logged.session_id == event.session_id)
            .count();
        let ui_ctx = ctx.ui_context(false);
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Distraction logged",
                &[("This session", count.to_string())],
            ),
        );
    }
    Ok(())
}

fn parse_mood(value: Option<&str>) -> anyhow::Result<Option<Mood>> {
    value
        .map(|raw| raw.parse::<Mood>().map_err(CliError::invalid_input))
        .transpose()
        .map_err(Into::into)
}

/// Ask for a reflection and mood on a terminal.
fn prompt_reflection() -> anyhow::Result<(Option<String>, Option<Mood>)> {
    let theme = ColorfulTheme::default();
    let reflection: String = Input::with_theme(&theme)
        .with_prompt("How did it go? (optional)")
        .allow_empty(true)
        .interact_text()?;

    let choices = ["productive", "mixed", "distracted", "skip"];
    let picked = Select::with_theme(&theme)
        .with_prompt("Mood")
        .items(&choices)
        .default(0)
        .interact()?;
    let mood = match choices[picked] {
        "skip" => None,
        other => Some(other.parse::<Mood>().map_err(CliError::invalid_input)?),
    };
    Ok((Some(reflection), mood))
}

pub fn handle_finish(ctx: &AppContext, args: &FinishArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let mut machine = ctx.machine()?;

    let (reflection, mood) = if args.skip {
        (None, None)
    } else if args.reflection.is_none()
        && args.mood.is_none()
        && ui_ctx.is_interactive()
        && !ctx.quiet()
        && machine.status() != TimerStatus::Idle
    {
        prompt_reflection()?
    } else {
        (args.reflection.clone(), parse_mood(args.mood.as_deref())?)
    };

    let session = machine.finalize(reflection, mood)?;

    if !ctx.quiet() {
        let mut items = vec![
            ("Session", short_id(&session.id)),
            ("Duration", format!("{} min", session.duration_minutes())),
            ("Distractions", session.distracted_count.to_string()),
        ];
        if let Some(mood) = session.mood {
            items.push(("Mood", mood.to_string()));
        }
        print(&ui_ctx, &receipt(&ui_ctx, "Session recorded", &items));
    }
    Ok(())
}

pub fn handle_discard(ctx: &AppContext) -> anyhow::Result<()> {
    let mut machine = ctx.machine()?;
    machine.discard()?;
    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false);
        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "Timer cleared"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mood() {
        assert_eq!(parse_mood(None).unwrap(), None);
        assert_eq!(parse_mood(Some("Mixed")).unwrap(), Some(Mood::Mixed));
        let err = parse_mood(Some("sleepy")).unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }
}
