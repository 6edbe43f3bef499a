//! Configuration System
//!
//! Layered configuration for hosts built on tabwise: built-in defaults, the
//! global file, an optional explicit file, then `TABWISE_*` environment
//! variables. Tests included.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabwiseConfig {
    /// Completion engine behavior
    #[serde(default)]
    pub completion: CompletionSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings consulted while resolving and while generating scripts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSettings {
    /// Turn a panicking completion function into an error directive
    #[serde(default = "default_true")]
    pub contain_panics: bool,

    /// Default for the `completion` command when `--no-descriptions` is absent
    #[serde(default = "default_true")]
    pub descriptions: bool,

    /// Variable generated scripts read to find their debug log
    #[serde(default = "default_debug_file_env")]
    pub debug_file_env: String,
}

fn default_true() -> bool {
    true
}

fn default_debug_file_env() -> String {
    crate::completion::DEBUG_FILE_ENV.to_string()
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            contain_panics: true,
            descriptions: true,
            debug_file_env: default_debug_file_env(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Completion(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Completion(msg) => write!(f, "Completion: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

impl CompletionSettings {
    pub fn validate(&self) -> Result<(), String> {
        let name = &self.debug_file_env;
        if name.is_empty() {
            return Err("debug_file_env cannot be empty".to_string());
        }
        let valid = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !name.starts_with(|c: char| c.is_ascii_digit());
        if !valid {
            return Err(format!(
                "debug_file_env '{}' is not a valid environment variable name",
                name
            ));
        }
        Ok(())
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<ValidationError>) {
    if !LEVELS.contains(&logging.level.as_str()) {
        errors.push(ValidationError::Logging(format!(
            "Unknown level '{}'",
            logging.level
        )));
    }
    if logging.format != "text" && logging.format != "json" {
        errors.push(ValidationError::Logging(format!(
            "Unknown format '{}'",
            logging.format
        )));
    }
    if !["stderr", "stdout", "file"].contains(&logging.output.as_str()) {
        errors.push(ValidationError::Logging(format!(
            "Unknown output '{}'",
            logging.output
        )));
    }
    for (module, level) in &logging.modules {
        if !LEVELS.contains(&level.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "Unknown level '{}' for module '{}'",
                level, module
            )));
        }
    }
}

impl TabwiseConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.completion.validate() {
            errors.push(ValidationError::Completion(e));
        }
        validate_logging(&self.logging, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Dotted names of every scalar setting, sorted within each table.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Ok(value) = serde_json::to_value(self) {
            collect_keys(&value, "", &mut keys);
        }
        keys
    }

    /// Render one dotted key, `None` if it names nothing or a table.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        let mut current = &value;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) | serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub(crate) fn is_settable(key: &str) -> bool {
        let defaults = TabwiseConfig::default();
        defaults.keys().iter().any(|k| k == key)
            || key
                .strip_prefix("logging.modules.")
                .map_or(false, |module| !module.is_empty() && !module.contains('.'))
    }
}

fn collect_keys(value: &serde_json::Value, prefix: &str, keys: &mut Vec<String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (name, inner) in map {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{}.{}", prefix, name)
                };
                collect_keys(inner, &path, keys);
            }
        }
        _ => keys.push(prefix.to_string()),
    }
}
