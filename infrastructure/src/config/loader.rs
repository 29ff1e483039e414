//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project-level config file names, checked in order
pub const PROJECT_CONFIG_FILES: [&str; 2] = ["biorun.toml", ".biorun.toml"];

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "BIORUN_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `BIORUN_*` environment variables (`__` separates nesting)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./biorun.toml` or `./.biorun.toml`
    /// 4. Global: `<config_dir>/biorun/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            // Toml::file silently skips missing files; an explicit path must exist
            if !path.exists() {
                return Err(ConfigError::NotFound(path.clone()));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `<config_dir>/biorun/config.toml`
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("biorun").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe every source in priority order, with whether it was found
    pub fn sources(config_path: Option<&Path>) -> Vec<ConfigSource> {
        let mut sources = vec![ConfigSource {
            label: "Env",
            location: format!("{}* variables", ENV_PREFIX),
            found: std::env::vars().any(|(k, _)| k.starts_with(ENV_PREFIX)),
        }];

        if let Some(path) = config_path {
            sources.push(ConfigSource {
                label: "Explicit",
                location: path.display().to_string(),
                found: path.exists(),
            });
        }

        sources.push(match Self::project_config_path() {
            Some(path) => ConfigSource {
                label: "Project",
                location: path.display().to_string(),
                found: true,
            },
            None => ConfigSource {
                label: "Project",
                location: format!("./{} or ./{}", PROJECT_CONFIG_FILES[0], PROJECT_CONFIG_FILES[1]),
                found: false,
            },
        });

        if let Some(path) = Self::global_config_path() {
            sources.push(ConfigSource {
                label: "Global",
                found: path.exists(),
                location: path.display().to_string(),
            });
        }

        sources.push(ConfigSource {
            label: "Default",
            location: "built-in defaults".to_string(),
            found: true,
        });

        sources
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        for source in Self::sources(config_path) {
            println!("  {}", source);
        }
    }
}

/// One configuration layer as reported by `biorun config`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub label: &'static str,
    pub location: String,
    pub found: bool,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let marker = if self.found { "FOUND" } else { "     " };
        write!(f, "[{}] {:<9} {}", marker, format!("{}:", self.label), self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biorun_domain::OptionValue;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.execution.log);
        assert!(config.tools.is_empty());
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.ends_with("biorun/config.toml"));
    }

    #[test]
    fn test_load_project_file() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
            jail.create_file(
                "biorun.toml",
                r#"
[execution]
quiet = true

[tools.samtools]
args = { "-@" = 4 }
"#,
            )?;

            let config = ConfigLoader::load(None).unwrap();
            assert!(config.execution.quiet);
            assert!(config.execution.log);
            assert_eq!(
                config.tool("samtools").args.get("-@"),
                Some(&OptionValue::from("4"))
            );
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
            jail.create_file(".biorun.toml", "[tools.hisat2]\nindex = \"project\"\n")?;
            jail.create_file("custom.toml", "[tools.hisat2]\nindex = \"explicit\"\n")?;

            let config = ConfigLoader::load(Some(&PathBuf::from("custom.toml"))).unwrap();
            assert_eq!(config.tool("hisat2").index, Some(PathBuf::from("explicit")));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            jail.set_env("XDG_CONFIG_HOME", jail.directory().join("xdg").display());
            jail.create_file("biorun.toml", "[execution]\nverbose = false\n")?;
            jail.set_env("BIORUN_EXECUTION__VERBOSE", "true");
            jail.set_env("BIORUN_EXECUTION__LOG_DIR", "logs");

            let config = ConfigLoader::load(None).unwrap();
            assert!(config.execution.verbose);
            assert_eq!(config.execution.log_dir, Some(PathBuf::from("logs")));
            Ok(())
        });
    }

    // dirs honours XDG_CONFIG_HOME on Linux only
    #[cfg(target_os = "linux")]
    #[test]
    fn test_global_file_is_lowest_file_priority() {
        Jail::expect_with(|jail| {
            let xdg = jail.directory().join("xdg");
            jail.set_env("XDG_CONFIG_HOME", xdg.display());
            std::fs::create_dir_all(xdg.join("biorun")).unwrap();
            jail.create_file("xdg/biorun/config.toml", "[execution]\nlog = false\nquiet = true\n")?;
            jail.create_file("biorun.toml", "[execution]\nquiet = false\n")?;

            let config = ConfigLoader::load(None).unwrap();
            assert!(!config.execution.log);
            assert!(!config.execution.quiet);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let result = ConfigLoader::load(Some(&PathBuf::from("absent.toml")));
            assert!(matches!(result, Err(ConfigError::NotFound(_))));
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.toml", "[execution]\nverbose = \"loud\"\n")?;
            let result = ConfigLoader::load(Some(&PathBuf::from("bad.toml")));
            assert!(matches!(result, Err(ConfigError::Invalid(_))));
            Ok(())
        });
    }

    #[test]
    fn test_sources_list_explicit_and_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("mine.toml", "")?;
            let sources = ConfigLoader::sources(Some(Path::new("mine.toml")));

            let explicit = sources.iter().find(|s| s.label == "Explicit").unwrap();
            assert!(explicit.found);
            assert!(!sources.iter().find(|s| s.label == "Project").unwrap().found);
            assert_eq!(sources.last().unwrap().label, "Default");
            Ok(())
        });
    }
}
