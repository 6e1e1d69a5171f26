use std::path::PathBuf;

use focus_core::VERSION;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_store_path, write_config, FocusConfig};
use crate::errors::CliError;
use crate::ui::theme::{styled, styles};
use crate::ui::{hint, print, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let config_path = resolve_config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "FocusFlow is already set up ({})\nHint: Pass --force to overwrite the config.",
            config_path.display()
        ))
        .into());
    }

    let store_path = match (&args.path, &ctx.cli().store) {
        (_, Some(path)) | (Some(path), None) => PathBuf::from(path),
        (None, None) => default_store_path()?,
    };
    let config = FocusConfig::new(store_path.clone(), args.default_minutes);
    if config.timer.default_minutes == 0 {
        return Err(
            CliError::invalid_input("Default session length must be at least one minute").into(),
        );
    }
    write_config(&config_path, &config)?;

    let store = ctx.session_store()?;
    store.mark_onboarding_complete()?;
    store.vault().get_or_create_key()?;
    let fingerprint = store.vault().key_fingerprint()?.unwrap_or_default();

    if ctx.quiet() {
        return Ok(());
    }
    let ui_ctx = ctx.ui_context(false);
    if ui_ctx.mode.is_pretty() {
        print(
            &ui_ctx,
            &styled(&format!("FocusFlow {}", VERSION), styles::bold(), ui_ctx.color),
        );
    }
    print(
        &ui_ctx,
        &receipt(
            &ui_ctx,
            "FocusFlow is ready",
            &[
                ("Config", config_path.display().to_string()),
                ("Store", store_path.display().to_string()),
                ("Key", fingerprint),
                (
                    "Default length",
                    format!("{} min", config.timer.default_minutes),
                ),
            ],
        ),
    );
    print(&ui_ctx, &hint(&ui_ctx, "focus start --task \"What matters now\""));
    Ok(())
}
