//! Configuration loading and management.
//!
//! Settings come from a YAML file (`--config`, else `./pm.yaml`), then
//! environment variables, then command-line overrides applied by the binary.
//!
//! ## Environment Variables
//! - `PM_DB_PATH` - Database file path
//! - `PM_LOG_LEVEL` - Log filter directive (e.g. `debug`, `project_manager=trace`)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pm.yaml";

/// Default database file name.
pub const DEFAULT_DB_NAME: &str = "pm.sqlite";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// `pm.sqlite` in the home directory, or in the working directory when there is no home.
fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_DB_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_NAME))
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive passed to the tracing subscriber.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Where log lines go: `off`, `stdout`, `stderr` or a file path.
    #[serde(default = "default_log_output")]
    pub output: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: default_log_output(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_output() -> String {
    "stderr".to_string()
}

impl Config {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Parse configuration from YAML text. Missing sections fall back to defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load from an explicit file, or `./pm.yaml` if present, or defaults;
    /// then apply environment overrides.
    ///
    /// An explicit path that cannot be read is an error; a missing default file is not.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(db_path) = lookup("PM_DB_PATH").filter(|v| !v.is_empty()) {
            self.database.path = PathBuf::from(db_path);
        }

        if let Some(level) = lookup("PM_LOG_LEVEL").filter(|v| !v.is_empty()) {
            self.logging.level = level;
        }
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.database.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn defaults_point_at_pm_sqlite() {
        let config = Config::default();
        assert!(config.database.path.ends_with(DEFAULT_DB_NAME));
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.output, "stderr");
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = Config::from_yaml("database:\n  path: /tmp/work.sqlite\n").unwrap();
        assert_eq!(config.database.path, PathBuf::from("/tmp/work.sqlite"));
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::from_yaml("logging:\n  level: info\n").unwrap();
        let env: HashMap<&str, &str> =
            HashMap::from([("PM_DB_PATH", "other.sqlite"), ("PM_LOG_LEVEL", "debug")]);
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.database.path, PathBuf::from("other.sqlite"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn load_reads_file_and_reports_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pm.yaml");
        std::fs::write(&path, "logging:\n  output: stdout\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.logging.output, "stdout");

        assert!(Config::load(dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn ensure_db_dir_creates_parents() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.database.path = dir.path().join("nested/deeper/pm.sqlite");
        config.ensure_db_dir().unwrap();
        assert!(dir.path().join("nested/deeper").is_dir());
    }
}
