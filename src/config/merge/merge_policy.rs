//! Merge rules: built-in defaults first, every later source overrides.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("completion.contain_panics", true)?
        .set_default("completion.descriptions", true)?
        .set_default("completion.debug_file_env", crate::completion::DEBUG_FILE_ENV)?
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
