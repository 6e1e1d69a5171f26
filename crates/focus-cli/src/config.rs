use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use focus_core::storage::DEFAULT_NAMESPACE;

use crate::constants::{DEFAULT_MINUTES, DEFAULT_PRESETS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusConfig {
    pub store: StoreSection,
    #[serde(default)]
    pub timer: TimerSection,
    #[serde(default)]
    pub notifications: NotificationsSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSection {
    pub default_minutes: u32,
    pub presets: Vec<u32>,
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            default_minutes: DEFAULT_MINUTES,
            presets: DEFAULT_PRESETS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsSection {
    pub enabled: bool,
}

impl Default for NotificationsSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl FocusConfig {
    pub fn new(store_path: PathBuf, default_minutes: Option<u32>) -> Self {
        Self {
            store: StoreSection {
                path: store_path.to_string_lossy().to_string(),
                namespace: default_namespace(),
            },
            timer: TimerSection {
                default_minutes: default_minutes.unwrap_or(DEFAULT_MINUTES),
                ..TimerSection::default()
            },
            notifications: NotificationsSection::default(),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("focus.sqlite3"))
}

pub fn read_config(path: &Path) -> anyhow::Result<FocusConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &FocusConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}

fn xdg_dir(var: &str, fallback: &[&str]) -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(var) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("focus"));
        }
    }
    let mut path = home_dir()?;
    for part in fallback {
        path.push(part);
    }
    Ok(path.join("focus"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
