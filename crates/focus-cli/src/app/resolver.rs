//! Path resolution for config and store files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_store_path, FocusConfig};

/// Resolve the config file path, checking FOCUS_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("FOCUS_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the store path: `--store`/`FOCUS_STORE`, then config, then the XDG default.
pub fn resolve_store_path(cli: &Cli, config: Option<&FocusConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.store.as_deref() {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    if let Some(config) = config {
        return Ok(PathBuf::from(&config.store.path));
    }
    default_store_path()
}

/// Error message when the config file is missing.
pub fn missing_config_message(config_path: &Path) -> String {
    format!(
        "No FocusFlow config found at {}\nHint: Run `focus init`, or point FOCUS_CONFIG at an existing config.",
        config_path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_store_flag_wins_over_config() {
        let cli = Cli::try_parse_from(["focus", "--store", "/tmp/a.sqlite3", "status"]).unwrap();
        let config = FocusConfig::new(PathBuf::from("/tmp/b.sqlite3"), None);
        let path = resolve_store_path(&cli, Some(&config)).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/a.sqlite3"));
    }

    #[test]
    fn test_config_path_used_without_flag() {
        let cli = Cli::try_parse_from(["focus", "status"]).unwrap();
        if cli.store.is_some() {
            // FOCUS_STORE is set in this environment
            return;
        }
        let config = FocusConfig::new(PathBuf::from("/tmp/b.sqlite3"), None);
        let path = resolve_store_path(&cli, Some(&config)).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/b.sqlite3"));
    }
}
