//! Application configuration loaded from `lazytodo.toml`.
//!
//! ```toml
//! [storage]
//! db_path = "/home/me/.local/share/lazytodo/lazytodo.sqlite3"
//!
//! [logging]
//! level = "info"
//! dir = "/home/me/.local/state/lazytodo/logs"
//!
//! [reminders]
//! hour = 6
//! sweep_interval_hours = 24
//! permission = "default"   # default | granted | denied
//! ```
//!
//! Every section is defaulted, so a missing or empty file equals the default
//! configuration.

use crate::logging::default_log_level;
use crate::reminder::{
    Permission, ReminderSettings, DEFAULT_REMINDER_HOUR, DEFAULT_SWEEP_INTERVAL_HOURS,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "LAZYTODO_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "lazytodo.sqlite3";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub reminders: RemindersConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite file path; `None` falls back to the environment or temp dir.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute directory for rolling log files; `None` disables file logging.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_level() -> String {
    default_log_level().to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemindersConfig {
    #[serde(default = "default_hour")]
    pub hour: u32,
    #[serde(default = "default_sweep_interval_hours")]
    pub sweep_interval_hours: u32,
    /// Initial notification permission reported by console notifiers.
    #[serde(default)]
    pub permission: Permission,
}

fn default_hour() -> u32 {
    DEFAULT_REMINDER_HOUR
}

fn default_sweep_interval_hours() -> u32 {
    DEFAULT_SWEEP_INTERVAL_HOURS
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            hour: default_hour(),
            sweep_interval_hours: default_sweep_interval_hours(),
            permission: Permission::Default,
        }
    }
}

impl AppConfig {
    pub const FILE_NAME: &'static str = "lazytodo.toml";

    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`; a missing file yields the default configuration.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.reminders.hour > 23 {
            return Err(ConfigError::Invalid(format!(
                "reminders.hour must be 0..=23, got {}",
                self.reminders.hour
            )));
        }
        if self.reminders.sweep_interval_hours == 0 {
            return Err(ConfigError::Invalid(
                "reminders.sweep_interval_hours must be positive".to_string(),
            ));
        }
        if let Some(dir) = &self.logging.dir {
            if dir.to_str().is_none() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be valid UTF-8, got `{}`",
                    dir.display()
                )));
            }
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logging.dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    pub fn reminder_settings(&self) -> ReminderSettings {
        ReminderSettings {
            hour: self.reminders.hour,
            sweep_interval: chrono::Duration::hours(i64::from(self.reminders.sweep_interval_hours)),
        }
    }

    /// Resolves the database path: explicit override, then
    /// `LAZYTODO_DB_PATH`, then `storage.db_path`, then the temp dir.
    pub fn resolve_db_path(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Ok(raw) = std::env::var(DB_PATH_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        self.storage
            .db_path
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME))
    }
}
