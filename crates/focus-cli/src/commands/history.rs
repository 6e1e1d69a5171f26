//! `focus history` and `focus export`.

use std::path::Path;

use log::warn;

use focus_core::export::{sessions_to_csv, sessions_to_json};
use focus_core::storage::Session;

use crate::app::AppContext;
use crate::cli::{ExportArgs, ExportFormat, HistoryArgs};
use crate::output::history_json;
use crate::ui::{
    badge, format_datetime, header, hint, print, receipt, simple_table, single_line, truncate,
    Badge, Column,
};

fn newest_first(mut sessions: Vec<Session>, limit: Option<usize>) -> Vec<Session> {
    sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
    if let Some(limit) = limit {
        sessions.truncate(limit);
    }
    sessions
}

pub fn handle_history(ctx: &AppContext, args: &HistoryArgs) -> anyhow::Result<()> {
    let store = ctx.session_store()?;
    let loaded = store.load_sessions();
    let sessions = newest_first(loaded.value, args.limit);
    let ui_ctx = ctx.ui_context(args.json);

    if ui_ctx.mode.is_json() {
        let value = history_json(&sessions, loaded.diagnostic.as_deref());
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if let Some(diagnostic) = &loaded.diagnostic {
        eprintln!(
            "{}",
            badge(&ui_ctx, Badge::Warn, &format!("History unreadable: {}", diagnostic))
        );
    }

    print(&ui_ctx, &header(&ui_ctx, "history", None));
    if sessions.is_empty() {
        print(&ui_ctx, &badge(&ui_ctx, Badge::Info, "No sessions recorded yet"));
        print(&ui_ctx, &hint(&ui_ctx, "focus start"));
        return Ok(());
    }

    let pretty = ui_ctx.mode.is_pretty();
    let columns = [
        Column::new("Date"),
        Column::new("Min"),
        Column::new("Task"),
        Column::new("Distr."),
        Column::new("Mood"),
        Column::new("Reflection"),
    ];
    let rows: Vec<Vec<String>> = sessions
        .iter()
        .map(|session| {
            vec![
                format_datetime(&session.started_at, pretty),
                session.duration_minutes().to_string(),
                session.task_title.clone().unwrap_or_else(|| "-".to_string()),
                session.distracted_count.to_string(),
                session
                    .mood
                    .map(|mood| mood.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                session
                    .reflection
                    .as_deref()
                    .map(|text| truncate(&single_line(text), 40))
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    print(&ui_ctx, &simple_table(&ui_ctx, &columns, &rows));
    Ok(())
}

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let store = ctx.session_store()?;
    let loaded = store.load_sessions();
    if let Some(diagnostic) = &loaded.diagnostic {
        warn!("Exporting without unreadable history: {}", diagnostic);
    }
    let sessions = newest_first(loaded.value, None);

    let rendered = match args.format {
        ExportFormat::Csv => sessions_to_csv(&sessions),
        ExportFormat::Json => sessions_to_json(&sessions)?,
    };

    match &args.output {
        None => println!("{}", rendered),
        Some(path) => {
            let path = Path::new(path);
            std::fs::write(path, format!("{}\n", rendered))
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
            if !ctx.quiet() {
                let ui_ctx = ctx.ui_context(false);
                print(
                    &ui_ctx,
                    &receipt(
                        &ui_ctx,
                        "Exported",
                        &[
                            ("Sessions", sessions.len().to_string()),
                            ("File", path.display().to_string()),
                        ],
                    ),
                );
            }
        }
    }
    Ok(())
}
