use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use focus_core::VERSION;

/// FocusFlow - a focus timer with encrypted, resumable session history
#[derive(Parser)]
#[command(name = "focus")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the FocusFlow store (SQLite file)
    #[arg(short, long, global = true, env = "FOCUS_STORE")]
    pub store: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up FocusFlow (config, store and encryption key)
    Init(InitArgs),

    /// Start a focus session
    Start(StartArgs),

    /// Pause the running session
    Pause,

    /// Resume a paused session
    Resume,

    /// Show the current timer
    Status(StatusArgs),

    /// Log a distraction against the active session
    Distraction(DistractionArgs),

    /// Finish the session and record it
    Finish(FinishArgs),

    /// Abandon a completed or stale timer without recording it
    Discard,

    /// Show a live countdown until the session completes
    Watch,

    /// List recorded sessions, newest first
    History(HistoryArgs),

    /// Export session history
    Export(ExportArgs),

    /// Erase all FocusFlow data, including the encryption key
    Erase(EraseArgs),

    /// Check the store, key and history
    Doctor,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Store path to write into the config
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Default session length in minutes
    #[arg(long)]
    pub default_minutes: Option<u32>,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `start` command
#[derive(Args)]
pub struct StartArgs {
    /// Session length in minutes
    #[arg(short, long, conflicts_with_all = ["preset", "seconds"])]
    pub minutes: Option<u32>,

    /// Preset session length in minutes (25, 50 or 90)
    #[arg(short, long, conflicts_with = "seconds")]
    pub preset: Option<u32>,

    /// Session length in seconds
    #[arg(long)]
    pub seconds: Option<i64>,

    /// What you are focusing on
    #[arg(short, long)]
    pub task: Option<String>,
}

/// Arguments for the `status` command
#[derive(Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DistractionKind {
    Manual,
    TabSwitch,
}

/// Arguments for the `distraction` command
#[derive(Args)]
pub struct DistractionArgs {
    /// Distraction source
    #[arg(long, value_enum, default_value = "manual")]
    pub kind: DistractionKind,
}

/// Arguments for the `finish` command
#[derive(Args)]
pub struct FinishArgs {
    /// Short reflection on the session
    #[arg(short, long)]
    pub reflection: Option<String>,

    /// How it went (productive, distracted, mixed)
    #[arg(long)]
    pub mood: Option<String>,

    /// Skip the reflection
    #[arg(long, conflicts_with_all = ["reflection", "mood"])]
    pub skip: bool,
}

/// Arguments for the `history` command
#[derive(Args)]
pub struct HistoryArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,
}

/// Arguments for the `erase` command
#[derive(Args)]
pub struct EraseArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}
