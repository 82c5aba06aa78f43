//! Configuration loading and metadata directory resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the metadata directory
pub const METADATA_DIR_ENV: &str = "AMOC_METADATA_DIR";

/// Fallback metadata directory, relative to the working directory
pub const DEFAULT_METADATA_DIR: &str = "metadata";

/// Bootstrap configuration loaded from TOML
///
/// Every field is optional so a partial (or empty) file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Directory holding `<array>_array.yml` bundles
    #[serde(default)]
    pub metadata_dir: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for per-array log files; console only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Load the platform config file, or defaults if it is missing or broken
    ///
    /// A bad config file never stops processing; it is reported and skipped.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                Self::default()
            }
        }
    }
}

/// Platform config file location: `<config_dir>/amocarray/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("amocarray").join("config.toml"))
}

/// Metadata directory resolution
///
/// Priority order:
/// 1. Command-line argument (highest priority)
/// 2. `AMOC_METADATA_DIR` environment variable
/// 3. `metadata_dir` in the TOML config file
/// 4. `./metadata` (fallback)
#[derive(Debug, Clone)]
pub struct MetadataDirResolver {
    cli_arg: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

impl MetadataDirResolver {
    /// Resolver that consults the platform config file
    pub fn new() -> Self {
        Self {
            cli_arg: None,
            config_path: default_config_path(),
        }
    }

    pub fn with_cli_arg(mut self, cli_arg: Option<PathBuf>) -> Self {
        self.cli_arg = cli_arg;
        self
    }

    /// Override the config file location
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(METADATA_DIR_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        let config = TomlConfig::load_or_default(self.config_path.as_deref());
        if let Some(dir) = config.metadata_dir {
            return dir;
        }

        // Priority 4: Fallback
        PathBuf::from(DEFAULT_METADATA_DIR)
    }
}

impl Default for MetadataDirResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.metadata_dir.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.log_dir.is_none());
    }

    #[test]
    fn test_full_toml() {
        let config = TomlConfig::from_toml_str(
            r#"
metadata_dir = "/data/amoc/metadata"

[logging]
level = "debug"
log_dir = "/var/log/amoc"
"#,
        )
        .unwrap();
        assert_eq!(config.metadata_dir, Some(PathBuf::from("/data/amoc/metadata")));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.log_dir, Some(PathBuf::from("/var/log/amoc")));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("metadata_dir = [").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = TomlConfig::load_or_default(Some(Path::new("/nonexistent/amoc/config.toml")));
        assert_eq!(config, TomlConfig::default());
    }

    #[test]
    fn test_cli_arg_wins() {
        let resolver = MetadataDirResolver::new().with_cli_arg(Some(PathBuf::from("/cli/meta")));
        assert_eq!(resolver.resolve(), PathBuf::from("/cli/meta"));
    }
}
