//! Single entry point that assembles every configuration source in order.

use super::merge::builder_with_defaults;
use super::sources::{environment, global_file};
use super::TabwiseConfig;
use crate::error::CliError;
use config::ConfigError;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the global file, then `TABWISE_*` variables.
    pub fn load() -> Result<TabwiseConfig, ConfigError> {
        Self::load_with(None)
    }

    /// Like [`ConfigLoader::load`], with an explicit file layered between
    /// the global file and the environment.
    pub fn load_with(explicit: Option<&Path>) -> Result<TabwiseConfig, ConfigError> {
        let mut builder = global_file::add_to_builder(builder_with_defaults()?)?;
        if let Some(path) = explicit {
            debug!(config_path = %path.display(), "Loading explicit configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }
        environment::add_to_builder(builder)
            .build()?
            .try_deserialize()
    }

    /// Defaults plus exactly one file; no global file, no environment.
    pub fn load_from_file(path: &Path) -> Result<TabwiseConfig, ConfigError> {
        builder_with_defaults()?
            .add_source(config::File::from(path).required(true))
            .build()?
            .try_deserialize()
    }

    /// Where the global file is looked for, whether or not it exists.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    pub fn default() -> TabwiseConfig {
        TabwiseConfig::default()
    }

    /// Set one dotted key in a TOML file, creating the file and any missing
    /// tables. The result must still load and validate or nothing is written.
    pub fn set_in_file(path: &Path, key: &str, value: &str) -> Result<(), CliError> {
        if !TabwiseConfig::is_settable(key) {
            return Err(CliError::Config(format!("Unknown configuration key: {}", key)));
        }

        let mut table = if path.exists() {
            std::fs::read_to_string(path)?
                .parse::<toml::Table>()
                .map_err(|e| CliError::Config(format!("Failed to parse {}: {}", path.display(), e)))?
        } else {
            toml::Table::new()
        };

        let mut parts: Vec<&str> = key.split('.').collect();
        let leaf = parts.pop().unwrap_or(key);
        let mut current = &mut table;
        for part in parts {
            let entry = current
                .entry(part.to_string())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            current = match entry {
                toml::Value::Table(inner) => inner,
                _ => {
                    return Err(CliError::Config(format!(
                        "Key '{}' is not a table in {}",
                        part,
                        path.display()
                    )))
                }
            };
        }
        current.insert(leaf.to_string(), parse_scalar(value));

        let rendered = toml::to_string_pretty(&table)
            .map_err(|e| CliError::Config(format!("Failed to render configuration: {}", e)))?;
        let candidate: TabwiseConfig = toml::from_str(&rendered)
            .map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))?;
        candidate.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            CliError::Config(format!("Configuration validation failed:\n{}", msgs.join("\n")))
        })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, rendered)?;
        debug!(config_path = %path.display(), key, "Configuration updated");
        Ok(())
    }
}

fn parse_scalar(value: &str) -> toml::Value {
    if let Ok(b) = value.parse::<bool>() {
        toml::Value::Boolean(b)
    } else if let Ok(i) = value.parse::<i64>() {
        toml::Value::Integer(i)
    } else {
        toml::Value::String(value.to_string())
    }
}
