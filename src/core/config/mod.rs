//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$GITQUEST_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitquest/config.toml`
//! 3. `~/.gitquest/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use gitquest::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("Autosave: {}", config.autosave());
//! println!("Debounce: {:?}", config.debounce());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, LessonDefaults};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GITQUEST_CONFIG";

/// Default autosave quiescence window.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration with accessor defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Raw file contents (all fields optional)
    pub global: GlobalConfig,
    /// Path the config was loaded from, if any
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// holds invalid values. A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let global: GlobalConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        global.validate()?;

        Ok(Self {
            global,
            loaded_from: Some(path.to_path_buf()),
        })
    }

    /// Find the first existing config file.
    fn locate() -> Option<PathBuf> {
        let candidates = [
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var_os("XDG_CONFIG_HOME")
                .map(|xdg| PathBuf::from(xdg).join("gitquest/config.toml")),
            dirs::home_dir().map(|home| home.join(".gitquest/config.toml")),
        ];

        candidates.into_iter().flatten().find(|p| p.exists())
    }

    /// Where `write` puts the file.
    ///
    /// `$GITQUEST_CONFIG` if set, otherwise `~/.gitquest/config.toml`.
    pub fn write_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".gitquest/config.toml"))
    }

    /// Write config atomically to [`Config::write_path`].
    pub fn write(config: &GlobalConfig) -> Result<PathBuf, ConfigError> {
        let path = Self::write_path()?;
        Self::write_to(&path, config)?;
        Ok(path)
    }

    /// Write config atomically to `path`.
    ///
    /// Creates parent directories if needed. Writes a temp file in the same
    /// directory and renames it over the target.
    pub fn write_to(path: &Path, config: &GlobalConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let write_err = |source| ConfigError::WriteError {
            path: temp_path.clone(),
            source,
        };
        let mut file = fs::File::create(&temp_path).map_err(write_err)?;
        file.write_all(contents.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// File backing the durable store.
    ///
    /// Defaults to `~/.gitquest/state.toml`.
    pub fn store_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.global.store_path {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".gitquest/state.toml"))
    }

    /// Whether the interactive shell autosaves. Defaults to `true`.
    pub fn autosave(&self) -> bool {
        self.global.autosave.unwrap_or(true)
    }

    /// Autosave quiescence window. Defaults to 500ms.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.global.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
    }

    /// Whether lessons advance on their own. Defaults to `true`.
    pub fn auto_advance(&self) -> bool {
        self.global
            .lessons
            .as_ref()
            .and_then(|l| l.auto_advance)
            .unwrap_or(true)
    }

    /// Path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    /// Set a value by dotted key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for unknown keys or values that
    /// do not parse or validate.
    pub fn set(global: &mut GlobalConfig, key: &str, value: &str) -> Result<(), ConfigError> {
        let parse_bool = |v: &str| {
            v.parse::<bool>()
                .map_err(|_| ConfigError::InvalidValue(format!("{key} expects true or false")))
        };

        match key {
            "store_path" => global.store_path = Some(value.to_string()),
            "autosave" => global.autosave = Some(parse_bool(value)?),
            "debounce_ms" => {
                let ms = value.parse::<u64>().map_err(|_| {
                    ConfigError::InvalidValue(format!("debounce_ms expects a number, got {value}"))
                })?;
                global.debounce_ms = Some(ms);
            }
            "lessons.auto_advance" => {
                global
                    .lessons
                    .get_or_insert_with(LessonDefaults::default)
                    .auto_advance = Some(parse_bool(value)?);
            }
            _ => {
                return Err(ConfigError::InvalidValue(format!(
                    "unknown configuration key: {key}"
                )))
            }
        }

        global.validate()
    }
}
