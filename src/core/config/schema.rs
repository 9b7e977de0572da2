//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing (e.g., the debounce window
//! must be positive and bounded).

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Longest accepted autosave debounce window.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

/// User configuration.
///
/// # Example
///
/// ```toml
/// store_path = "/home/me/.gitquest/state.toml"
/// autosave = true
/// debounce_ms = 500
///
/// [lessons]
/// auto_advance = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// File backing the durable key/value store
    pub store_path: Option<String>,

    /// Debounced autosave in the interactive shell
    pub autosave: Option<bool>,

    /// Autosave quiescence window in milliseconds
    pub debounce_ms: Option<u64>,

    /// Lesson behavior
    pub lessons: Option<LessonDefaults>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ms) = self.debounce_ms {
            if ms == 0 || ms > MAX_DEBOUNCE_MS {
                return Err(ConfigError::InvalidValue(format!(
                    "debounce_ms must be between 1 and {MAX_DEBOUNCE_MS}, got {ms}"
                )));
            }
        }

        if let Some(path) = &self.store_path {
            if path.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "store_path cannot be empty".into(),
                ));
            }
        }

        Ok(())
    }
}

/// Lesson defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LessonDefaults {
    /// Advance automatically when an operation satisfies the current step
    pub auto_advance: Option<bool>,
}
