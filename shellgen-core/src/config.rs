//! Runtime configuration.
//!
//! Precedence: CLI flag > environment > config file > built-in default.

use crate::errors::ConfigError;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";

pub const API_BASE_ENV: &str = "SHELLGEN_API_BASE";
pub const TIMEOUT_ENV: &str = "SHELLGEN_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct Config {
    /// Always ends with `/` so endpoint joins keep the base path.
    pub api_base: Url,
    pub timeout_secs: u64,
    pub download_dir: PathBuf,
}

/// Values read from the TOML config file.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ConfigFile {
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
    pub download_dir: Option<PathBuf>,
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Built-in defaults, before any file, environment or flag is applied.
    pub fn defaults() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: parse_api_base(DEFAULT_API_BASE)?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
        })
    }

    /// Resolve against the real environment and config file.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let file = match overrides.config_path {
            Some(ref path) => Some(load_file(path)?),
            None => match default_config_path() {
                Some(path) if path.exists() => Some(load_file(&path)?),
                _ => None,
            },
        };
        Self::resolve_with(overrides, |name| std::env::var(name).ok(), file)
    }

    pub fn resolve_with(
        overrides: &ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
        file: Option<ConfigFile>,
    ) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();
        let mut config = Config::defaults()?;

        let api_base = overrides
            .api_base
            .clone()
            .or_else(|| env(API_BASE_ENV))
            .or(file.api_base);
        if let Some(raw) = api_base {
            config.api_base = parse_api_base(&raw)?;
        }

        let timeout = match overrides.timeout_secs {
            Some(secs) => Some(secs),
            None => match env(TIMEOUT_ENV) {
                Some(raw) => Some(
                    raw.trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
                ),
                None => file.timeout_secs,
            },
        };
        if let Some(secs) = timeout {
            config.timeout_secs = secs;
        }

        if let Some(dir) = file.download_dir {
            config.download_dir = dir;
        }

        debug!(
            "Config resolved: api_base={} timeout={}s download_dir={}",
            config.api_base,
            config.timeout_secs,
            config.download_dir.display()
        );
        Ok(config)
    }
}

pub fn load_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Parse the API base URL, forcing a trailing slash.
pub fn parse_api_base(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let normalised = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Url::parse(&normalised).map_err(|source| ConfigError::InvalidApiBase {
        value: raw.to_string(),
        source,
    })
}

fn default_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("shellgen").join("config.toml"))
}
