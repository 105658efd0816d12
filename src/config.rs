use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::display::DisplayOptions;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One request at startup, more only on demand.
    Pull,
    /// Initial request plus a subscription fed by the sampler.
    #[default]
    Push,
    /// Fixed example data, no collector.
    Static,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pull" => Ok(Mode::Pull),
            "push" => Ok(Mode::Push),
            "static" => Ok(Mode::Static),
            other => Err(format!("unknown mode `{other}` (expected pull, push or static)")),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mode::Pull => "pull",
            Mode::Push => "push",
            Mode::Static => "static",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub display: DisplayConfig,
    pub preferences: PreferencesConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    pub mode: Mode,
    pub include_processes: bool,
    pub operating_system: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 2000,
            mode: Mode::Push,
            include_processes: true,
            operating_system: std::env::consts::OS.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub marker: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            marker: "syspanel".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            include_processes: self.general.include_processes,
            marker: self.display.marker.clone(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("syspanel").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "invalid config, using defaults");
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}
