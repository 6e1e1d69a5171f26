//! `focus erase` and `focus doctor`.

use dialoguer::Confirm;

use focus_core::TimerStatus;

use crate::app::{missing_config_message, resolve_config_path, AppContext};
use crate::cli::EraseArgs;
use crate::errors::CliError;
use crate::ui::{badge, header, hint, kv, print, Badge, OutputMode, UiContext};

pub fn handle_erase(ctx: &AppContext, args: &EraseArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);

    if !args.yes {
        if !ui_ctx.is_interactive() {
            return Err(CliError::invalid_input(
                "Refusing to erase without confirmation\nHint: Pass --yes to erase non-interactively.",
            )
            .into());
        }
        let proceed = Confirm::new()
            .with_prompt("Erase all sessions, distractions, the timer and the encryption key?")
            .default(false)
            .interact()?;
        if !proceed {
            match ui_ctx.mode {
                OutputMode::Pretty => {
                    print(&ui_ctx, &badge(&ui_ctx, Badge::Warn, "Erase cancelled"))
                }
                OutputMode::Plain | OutputMode::Json => println!("status=cancelled"),
            }
            return Ok(());
        }
    }

    let store = ctx.session_store()?;
    store.erase_all()?;

    if !ctx.quiet() {
        print(&ui_ctx, &badge(&ui_ctx, Badge::Ok, "All FocusFlow data erased"));
    }
    Ok(())
}

fn check_line(ui_ctx: &UiContext, kind: Badge, label: &str, detail: &str) {
    if ui_ctx.mode.is_pretty() {
        print(ui_ctx, &badge(ui_ctx, kind, &format!("{}: {}", label, detail)));
    } else {
        let status = match kind {
            Badge::Ok | Badge::Info => "ok",
            Badge::Warn => "warn",
            Badge::Err => "error",
        };
        print(ui_ctx, &kv(ui_ctx, label, &format!("{} {}", status, detail)));
    }
}

pub fn handle_doctor(ctx: &AppContext) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    print(&ui_ctx, &header(&ui_ctx, "doctor", None));

    let config_path = resolve_config_path()?;
    if config_path.exists() {
        check_line(&ui_ctx, Badge::Ok, "Config", &config_path.display().to_string());
    } else {
        let message = missing_config_message(&config_path);
        let first_line = message.lines().next().unwrap_or_default();
        check_line(&ui_ctx, Badge::Warn, "Config", first_line);
    }

    let store_path = ctx.store_path()?;
    if !store_path.exists() {
        return Err(CliError::not_found(
            format!("No FocusFlow store found at {}", store_path.display()),
            "Run `focus init` or `focus start` to create one.",
        )
        .into());
    }

    let store = ctx.session_store()?;
    check_line(&ui_ctx, Badge::Ok, "Store", &store.backend().describe());

    let mut problems = 0;
    match store.vault().key_fingerprint() {
        Ok(Some(fingerprint)) => check_line(&ui_ctx, Badge::Ok, "Key", &fingerprint),
        Ok(None) => check_line(&ui_ctx, Badge::Info, "Key", "not created yet"),
        Err(e) => {
            problems += 1;
            check_line(&ui_ctx, Badge::Err, "Key", &e.to_string());
        }
    }

    let sessions = store.load_sessions();
    match &sessions.diagnostic {
        None => check_line(
            &ui_ctx,
            Badge::Ok,
            "Sessions",
            &format!("{} recorded", sessions.value.len()),
        ),
        Some(diagnostic) => {
            problems += 1;
            check_line(&ui_ctx, Badge::Err, "Sessions", diagnostic);
        }
    }

    let events = store.load_events();
    match &events.diagnostic {
        None => check_line(
            &ui_ctx,
            Badge::Ok,
            "Distractions",
            &format!("{} logged", events.value.len()),
        ),
        Some(diagnostic) => {
            problems += 1;
            check_line(&ui_ctx, Badge::Err, "Distractions", diagnostic);
        }
    }

    match store.load_timer_snapshot() {
        Ok(snapshot) => {
            let status = TimerStatus::of(snapshot.as_ref());
            check_line(&ui_ctx, Badge::Ok, "Timer", status.as_str());
        }
        Err(e) => {
            problems += 1;
            check_line(&ui_ctx, Badge::Err, "Timer", &e.to_string());
        }
    }

    if problems > 0 {
        print(&ui_ctx, &hint(&ui_ctx, "focus erase --yes resets everything"));
        return Err(anyhow::anyhow!("{} check(s) failed", problems));
    }
    Ok(())
}
