//! Configuration loading and resolution
//!
//! Every setting is resolved independently, first match wins:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_CONFIG_FILE: &str = "SONGS_CONFIG";
pub const ENV_DATABASE_PATH: &str = "SONGS_DATABASE_PATH";
pub const ENV_HOST: &str = "SONGS_HOST";
pub const ENV_PORT: &str = "SONGS_PORT";
pub const ENV_LOG_LEVEL: &str = "SONGS_LOG";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub database_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl ServiceConfig {
    /// Resolve the configuration from CLI overrides, environment, TOML file and defaults
    pub fn resolve(cli: &ConfigOverrides) -> Result<Self> {
        let toml = match locate_config_file(cli)? {
            Some(path) => {
                debug!("Loading config file {}", path.display());
                load_toml_config(&path)?
            }
            None => TomlConfig::default(),
        };

        let env_port = match env_var(ENV_PORT) {
            Some(raw) => Some(raw.parse::<u16>().map_err(|_| {
                Error::Config(format!("{} must be a port number, got {:?}", ENV_PORT, raw))
            })?),
            None => None,
        };

        Ok(Self {
            database_path: cli
                .database_path
                .clone()
                .or_else(|| env_var(ENV_DATABASE_PATH).map(PathBuf::from))
                .or(toml.database_path)
                .unwrap_or_else(default_database_path),
            host: cli
                .host
                .clone()
                .or_else(|| env_var(ENV_HOST))
                .or(toml.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: cli.port.or(env_port).or(toml.port).unwrap_or(DEFAULT_PORT),
            log_level: cli
                .log_level
                .clone()
                .or_else(|| env_var(ENV_LOG_LEVEL))
                .or(toml.logging.level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// `host:port` string suitable for binding a listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Find the config file to read, if any
///
/// An explicitly requested file (CLI or env) must exist; the per-user
/// default location is only used when present.
fn locate_config_file(cli: &ConfigOverrides) -> Result<Option<PathBuf>> {
    if let Some(path) = cli
        .config_file
        .clone()
        .or_else(|| env_var(ENV_CONFIG_FILE).map(PathBuf::from))
    {
        if !path.exists() {
            return Err(Error::Config(format!("Config file not found: {}", path.display())));
        }
        return Ok(Some(path));
    }

    Ok(dirs::config_dir()
        .map(|d| d.join("songs").join("config.toml"))
        .filter(|p| p.exists()))
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("songs"))
        .unwrap_or_else(|| PathBuf::from("./songs_data"))
        .join("songs.db")
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
