// src/config/scraper.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::{env, fs, path::Path, path::PathBuf};

use crate::scrape::fetch::DEFAULT_USER_AGENTS;

pub const ENV_CONFIG_PATH: &str = "SCRAPER_CONFIG_PATH";
pub const ENV_URL: &str = "SCRAPER_URL";
pub const ENV_INTERVAL_SECS: &str = "SCRAPE_INTERVAL_SECS";

pub const DEFAULT_URL: &str = "http://books.toscrape.com/";
pub const DEFAULT_INTERVAL_SECS: u64 = 3600;

fn default_url() -> String {
    DEFAULT_URL.to_string()
}
fn default_max_retries() -> u32 {
    3
}
fn default_delay_min_ms() -> u64 {
    1_000
}
fn default_delay_max_ms() -> u64 {
    3_000
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}
fn default_csv_path() -> PathBuf {
    PathBuf::from("books.csv")
}
fn default_json_path() -> PathBuf {
    PathBuf::from("books.json")
}
fn default_sqlite_path() -> PathBuf {
    PathBuf::from("books.db")
}
fn default_user_agents() -> Vec<String> {
    DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScraperConfig {
    #[serde(default = "default_url")]
    pub url: String,
    /// Attempts per run (not extra retries). 0 is treated as 1.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_delay_min_ms")]
    pub retry_delay_min_ms: u64,
    #[serde(default = "default_delay_max_ms")]
    pub retry_delay_max_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    #[serde(default = "default_json_path")]
    pub json_path: PathBuf,
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_retries: default_max_retries(),
            retry_delay_min_ms: default_delay_min_ms(),
            retry_delay_max_ms: default_delay_max_ms(),
            request_timeout_secs: default_timeout_secs(),
            interval_secs: default_interval_secs(),
            csv_path: default_csv_path(),
            json_path: default_json_path(),
            sqlite_path: default_sqlite_path(),
            user_agents: default_user_agents(),
        }
    }
}

impl ScraperConfig {
    /// Clamp out-of-range values back into something runnable.
    pub fn sanitized(mut self) -> Self {
        if self.max_retries == 0 {
            self.max_retries = 1;
        }
        if self.retry_delay_min_ms > self.retry_delay_max_ms {
            std::mem::swap(&mut self.retry_delay_min_ms, &mut self.retry_delay_max_ms);
        }
        if self.interval_secs == 0 {
            self.interval_secs = DEFAULT_INTERVAL_SECS;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_timeout_secs();
        }
        self.user_agents.retain(|ua| !ua.trim().is_empty());
        if self.user_agents.is_empty() {
            self.user_agents = default_user_agents();
        }
        self
    }

    /// `SCRAPER_URL` and `SCRAPE_INTERVAL_SECS` win over file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = env::var(ENV_URL) {
            if !url.trim().is_empty() {
                self.url = url.trim().to_string();
            }
        }
        if let Some(secs) = env::var(ENV_INTERVAL_SECS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.interval_secs = secs;
        }
        self
    }
}

/// Load from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<ScraperConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading scraper config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing scraper config {}", path.display()))
}

/// Load using env var + fallbacks:
/// 1) $SCRAPER_CONFIG_PATH
/// 2) config/scraper.toml
/// 3) config/scraper.json
/// 4) built-in defaults
///
/// Env overrides are applied on top, then the result is sanitized.
pub fn load_config_default() -> Result<ScraperConfig> {
    let base = if let Ok(p) = env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        load_config_from(&pb)?
    } else {
        let toml_p = PathBuf::from("config/scraper.toml");
        let json_p = PathBuf::from("config/scraper.json");
        if toml_p.exists() {
            load_config_from(&toml_p)?
        } else if json_p.exists() {
            load_config_from(&json_p)?
        } else {
            ScraperConfig::default()
        }
    };
    Ok(base.with_env_overrides().sanitized())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<ScraperConfig> {
    let looks_json = s.trim_start().starts_with('{');
    match hint_ext {
        "toml" => return Ok(toml::from_str(s)?),
        "json" => return Ok(serde_json::from_str(s)?),
        _ => {}
    }
    if looks_json {
        if let Ok(v) = serde_json::from_str(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = toml::from_str(s) {
        return Ok(v);
    }
    Err(anyhow!("unsupported scraper config format"))
}
