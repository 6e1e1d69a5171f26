//! Application context for the FocusFlow CLI.
//!
//! Provides a unified context that combines CLI arguments with the lazily
//! loaded config and store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use once_cell::unsync::OnceCell;

use focus_core::storage::{SessionStore, SqliteStore, DEFAULT_NAMESPACE};
use focus_core::{SystemClock, TimerMachine};

use crate::cli::Cli;
use crate::config::{read_config, FocusConfig, TimerSection};
use crate::ui::UiContext;

use super::notifier::TerminalNotifier;
use super::resolver::{resolve_config_path, resolve_store_path};

/// Application context that bundles CLI args with config and storage.
///
/// This avoids repeatedly loading config and threading multiple parameters
/// through handler functions.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<FocusConfig>>,
    store: OnceCell<Arc<SessionStore>>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            store: OnceCell::new(),
        }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The config file, if one exists.
    pub fn config(&self) -> anyhow::Result<Option<&FocusConfig>> {
        let config = self.config.get_or_try_init(|| -> anyhow::Result<_> {
            let path = resolve_config_path()?;
            if path.exists() {
                Ok(Some(read_config(&path)?))
            } else {
                Ok(None)
            }
        })?;
        Ok(config.as_ref())
    }

    pub fn timer_config(&self) -> anyhow::Result<TimerSection> {
        Ok(self
            .config()?
            .map(|config| config.timer.clone())
            .unwrap_or_default())
    }

    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        resolve_store_path(self.cli, self.config()?)
    }

    pub fn namespace(&self) -> anyhow::Result<String> {
        Ok(self
            .config()?
            .map(|config| config.store.namespace.clone())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()))
    }

    /// Open the Session & Timer Store, once per process.
    pub fn session_store(&self) -> anyhow::Result<Arc<SessionStore>> {
        let store = self.store.get_or_try_init(|| -> anyhow::Result<_> {
            let path = self.store_path()?;
            let backend = SqliteStore::open(&path)
                .with_context(|| format!("Failed to open store {}", path.display()))?;
            let namespace = self.namespace()?;
            Ok(Arc::new(SessionStore::with_namespace(
                Arc::new(backend),
                &namespace,
            )))
        })?;
        Ok(store.clone())
    }

    /// Build the timer machine and restore the persisted timer.
    pub fn machine(&self) -> anyhow::Result<TimerMachine> {
        let notifications = self
            .config()?
            .map(|config| config.notifications.enabled)
            .unwrap_or(true);
        let notifier = TerminalNotifier {
            enabled: notifications,
            quiet: self.quiet(),
        };

        let mut machine = TimerMachine::new(self.session_store()?, Arc::new(SystemClock))
            .with_notifier(Arc::new(notifier));
        machine.restore()?;
        Ok(machine)
    }

    /// UI context for this invocation.
    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color)
    }
}
