//! User configuration: the defaults applied to levels without an override,
//! the screenshot delay and the keybind to send.
//!
//! ```toml
//! delay = 0.5
//! keybind = ["F12"]
//!
//! [defaults]
//! screenshot_on_new_best = true
//! screenshot_on_complete = true
//! percent = 50
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::platform::KeyCode;
use crate::store::Defaults;

/// File name of the binary per-level settings store.
pub const SETTINGS_FILE_NAME: &str = "autoscreenshot_settings.dat";

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Host settings seam
// ---------------------------------------------------------------------------

/// Read-only view of the user settings owned by the host.
///
/// Values are fetched on every use so changes made while the game runs
/// apply to the next comparison.
pub trait HostSettings {
    fn defaults(&self) -> Defaults;
    fn delay(&self) -> Duration;
}

// ---------------------------------------------------------------------------
// File config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsSection {
    pub screenshot_on_new_best: bool,
    pub screenshot_on_complete: bool,
    pub percent: i64,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            screenshot_on_new_best: true,
            screenshot_on_complete: true,
            percent: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Seconds between the event and the keybind press.
    pub delay: f32,
    pub keybind: Vec<KeyCode>,
    /// Store location; defaults to a file next to the config file.
    pub settings_file: Option<PathBuf>,
    pub defaults: DefaultsSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delay: 0.0,
            keybind: vec![KeyCode::F12],
            settings_file: None,
            defaults: DefaultsSection::default(),
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/autoshot/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Reads and validates `path`. A missing file yields the built-in
    /// defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("config: {} not found, using built-in defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        let config = Self::from_toml_str(&text)?;
        log::debug!("config: loaded {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.defaults.percent) {
            return Err(ConfigError::Invalid(format!(
                "defaults.percent must be within 1..=100, got {}",
                self.defaults.percent
            )));
        }
        if let Err(e) = Duration::try_from_secs_f32(self.delay) {
            return Err(ConfigError::Invalid(format!(
                "delay must be a non-negative number of seconds, got {}: {e}",
                self.delay
            )));
        }
        if self.keybind.is_empty() {
            return Err(ConfigError::Invalid("keybind must name at least one key".into()));
        }
        Ok(())
    }

    /// Where the per-level store lives for a config read from `config_path`.
    pub fn settings_path(&self, config_path: &Path) -> PathBuf {
        match &self.settings_file {
            Some(path) => path.clone(),
            None => config_path.with_file_name(SETTINGS_FILE_NAME),
        }
    }
}

impl HostSettings for Config {
    fn defaults(&self) -> Defaults {
        Defaults {
            new_best: self.defaults.screenshot_on_new_best,
            complete: self.defaults.screenshot_on_complete,
            // In range after validate().
            percent: self.defaults.percent as i16,
        }
    }

    fn delay(&self) -> Duration {
        // Rejected by validate(); a hand-built Config falls back to no delay.
        Duration::try_from_secs_f32(self.delay).unwrap_or_default()
    }
}

/// Per-user config directory for this tool.
///
/// Respects `$XDG_CONFIG_HOME`; falls back to `$HOME/.config`.
pub fn config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("autoshot"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
