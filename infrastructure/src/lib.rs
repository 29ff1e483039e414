//! Infrastructure layer for biorun
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod dependencies;
pub mod filesystem;
pub mod logging;
pub mod process;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, ConfigSource, ConfigWarning, FileConfig, FileExecutionConfig,
    FileToolConfig,
};
pub use dependencies::{DiscoveredTool, DiscoveryResult, WhichDependencyChecker, discover_tools};
pub use filesystem::LocalFileSystem;
pub use logging::{EXECUTION_LOG_FILE, JsonlExecutionLogger};
pub use process::SystemProcessRunner;
