//! Run configuration: defaults, optional config file, CLI overrides.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Page the dates are scraped from.
pub const SOURCE_URL: &str = "https://isitbandcampfriday.com/";

/// Calendar file maintained by default, relative to the working directory.
pub const ICS_FILE: &str = "bandcamp-friday.ics";

/// HTTP timeout in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// Configuration for one update run.
///
/// Defaults cover the normal scheduled invocation; a config file at
/// `~/.config/bcfriday/config.toml` overrides them, and CLI flags override
/// both (see main).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Page to scrape dates from
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Path of the .ics file to maintain
    #[serde(default = "default_ics_file")]
    pub ics_file: PathBuf,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            ics_file: default_ics_file(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_source_url() -> String {
    SOURCE_URL.to_string()
}

fn default_ics_file() -> PathBuf {
    PathBuf::from(ICS_FILE)
}

fn default_timeout_secs() -> u64 {
    FETCH_TIMEOUT_SECS
}

/// Get the config file path (~/.config/bcfriday/config.toml)
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("bcfriday");
    Ok(config_dir.join("config.toml"))
}

/// Load config from ~/.config/bcfriday/config.toml. A missing file is fine
/// and yields the defaults.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

    Ok(config)
}
