use crate::core::{Result, SqlzooError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

/// Environment variable that overrides the default configuration path.
pub const CONFIG_ENV: &str = "SQLZOO_CONFIG";

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub database: Option<DatabaseConfig>,
    pub output: Option<OutputConfig>,
    pub logging: Option<LoggingConfig>,
}

/// Backing store location.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:` for the seeded sample catalog
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// One of `table`, `csv`, `json`, `markdown`
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl Config {
    pub fn database_path(&self) -> Option<&str> {
        self.database.as_ref()?.path.as_deref()
    }

    pub fn output_format(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .unwrap_or("table")
    }

    /// Log level from `[logging] level`, defaulting to `WARN`.
    pub fn log_level(&self) -> Result<Level> {
        match self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            Some(level) => level
                .parse::<Level>()
                .map_err(|_| SqlzooError::Config(format!("Invalid log level: '{}'", level))),
            None => Ok(Level::WARN),
        }
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = sqlzoo::config::load_config("config.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| SqlzooError::Config(format!("{}: {}", path.display(), e)))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| SqlzooError::Config(e.to_string()))
}

/// `$SQLZOO_CONFIG`, else `<config dir>/sqlzoo/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => Some(PathBuf::from(path)),
        None => dirs::config_dir().map(|dir| dir.join("sqlzoo").join("config.toml")),
    }
}

/// Loads the default configuration file, or the defaults when it does not exist.
pub fn load_default_config() -> Result<Config> {
    match default_config_path() {
        Some(path) if path.exists() => load_config(path),
        _ => Ok(Config::default()),
    }
}
