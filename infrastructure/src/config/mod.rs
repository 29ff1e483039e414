//! Configuration file loading for biorun
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `BIORUN_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./biorun.toml` or `./.biorun.toml`
//! 4. Global: `<config_dir>/biorun/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigWarning, FileConfig, FileExecutionConfig, FileToolConfig, TOOL_SECTIONS,
};
pub use loader::{ConfigError, ConfigLoader, ConfigSource, ENV_PREFIX, PROJECT_CONFIG_FILES};
