//! FocusFlow CLI - a focus timer with encrypted, resumable session history
//!
//! This is the command-line interface for FocusFlow. Every command restores
//! the persisted timer, acts on it and exits; `focus watch` stays attached
//! until the countdown completes.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod output;
mod ui;

use clap::{CommandFactory, Parser};
use env_logger::Env;

use crate::app::AppContext;
use crate::cli::{Cli, Commands, StatusArgs};
use crate::commands::{history, init, maintenance, misc, timer, watch};
use crate::errors::{exit_code_for, split_hint};
use crate::ui::print_error;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false);
        let (message, hint) = split_hint(&format!("{:#}", e));
        print_error(&ui_ctx, &message, hint.as_deref());
        std::process::exit(exit_code_for(&e));
    }
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => init::handle_init(ctx, args),
        Some(Commands::Start(args)) => timer::handle_start(ctx, args),
        Some(Commands::Pause) => timer::handle_pause(ctx),
        Some(Commands::Resume) => timer::handle_resume(ctx),
        Some(Commands::Status(args)) => timer::handle_status(ctx, args),
        Some(Commands::Distraction(args)) => timer::handle_distraction(ctx, args),
        Some(Commands::Finish(args)) => timer::handle_finish(ctx, args),
        Some(Commands::Discard) => timer::handle_discard(ctx),
        Some(Commands::Watch) => watch::handle_watch(ctx),
        Some(Commands::History(args)) => history::handle_history(ctx, args),
        Some(Commands::Export(args)) => history::handle_export(ctx, args),
        Some(Commands::Erase(args)) => maintenance::handle_erase(ctx, args),
        Some(Commands::Doctor) => maintenance::handle_doctor(ctx),
        Some(Commands::Completions { shell }) => misc::handle_completions(*shell),
        None => {
            // Bare `focus` shows the timer once set up, help otherwise.
            if ctx.config()?.is_some() {
                timer::handle_status(ctx, &StatusArgs { json: false })
            } else {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}
