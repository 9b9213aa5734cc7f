//! Bootstrap configuration and path resolution
//!
//! The TOML file carries bootstrap settings only (catalog location, listen
//! address, logging). A missing or broken file never stops startup: the
//! loader warns and falls back to built-in defaults.
//!
//! Catalog path priority:
//! 1. Command-line argument (highest priority)
//! 2. `MOODMIX_CATALOG` environment variable
//! 3. TOML `catalog_path`
//! 4. Compiled default (`dataset2.csv` in the working directory)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the catalog location
pub const CATALOG_ENV_VAR: &str = "MOODMIX_CATALOG";

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "MOODMIX_CONFIG";

/// Catalog file used when nothing else is configured
pub const DEFAULT_CATALOG_FILE: &str = "dataset2.csv";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Song catalog CSV (relative or absolute)
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_port() -> u16 {
    5000
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            port: default_port(),
            bind_address: default_bind_address(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse a config file, failing on I/O or syntax errors
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load config with graceful degradation
    ///
    /// `None`, a missing file or a malformed file all yield defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("No config file found, using built-in defaults");
            return Self::default();
        };

        if !path.exists() {
            warn!("Config file {} not found, using built-in defaults", path.display());
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{}; using built-in defaults", e);
                Self::default()
            }
        }
    }
}

/// Platform config file location (`<config dir>/moodmix/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("moodmix").join("config.toml"))
}

/// Locate the config file: CLI argument, then environment, then platform default
///
/// The platform default is only returned when the file exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path().filter(|p| p.exists())
}

/// Resolve the catalog CSV location following the documented priority order
pub fn resolve_catalog_path(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CATALOG_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.catalog_path {
        return path.clone();
    }

    // Priority 4: compiled default
    PathBuf::from(DEFAULT_CATALOG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TomlConfig = toml::from_str("catalog_path = \"songs.csv\"").unwrap();
        assert_eq!(config.catalog_path, Some(PathBuf::from("songs.csv")));
        assert_eq!(config.port, 5000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_logging_section() {
        let config: TomlConfig = toml::from_str("port = 8080\n[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_cli_arg_wins() {
        let config = TomlConfig {
            catalog_path: Some(PathBuf::from("from_toml.csv")),
            ..TomlConfig::default()
        };
        let path = resolve_catalog_path(Some(Path::new("from_cli.csv")), &config);
        assert_eq!(path, PathBuf::from("from_cli.csv"));
    }
}
