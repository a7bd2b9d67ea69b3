// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PATH: &str = "BADGES_CONFIG_PATH";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5055";
pub const DEFAULT_API_KEY: &str = "CHANGE-ME";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}
fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectorConfig {
    /// Metadata service root, e.g. `http://seerr.lan:5055` (no trailing slash).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Static credential sent as `X-Api-Key` on every request.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl InjectorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    fn sanitized(mut self) -> Self {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            default_base_url()
        } else {
            trimmed.to_string()
        };
        self.api_key = self.api_key.trim().to_string();
        if self.poll_interval_secs == 0 {
            self.poll_interval_secs = DEFAULT_POLL_INTERVAL_SECS;
        }
        self
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_from(path: &Path) -> Result<InjectorConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading badge config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
}

/// Load config using env var + fallbacks:
/// 1) $BADGES_CONFIG_PATH
/// 2) config/badges.toml
/// 3) config/badges.json
/// 4) compiled-in defaults
pub fn load_default() -> Result<InjectorConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        } else {
            return Err(anyhow!("BADGES_CONFIG_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/badges.toml");
    if toml_p.exists() {
        return load_from(&toml_p);
    }
    let json_p = PathBuf::from("config/badges.json");
    if json_p.exists() {
        return load_from(&json_p);
    }
    Ok(InjectorConfig::default())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<InjectorConfig> {
    if hint_ext == "json" || s.trim_start().starts_with('{') {
        let cfg: InjectorConfig = serde_json::from_str(s).context("parsing badge config json")?;
        return Ok(cfg.sanitized());
    }
    let cfg: InjectorConfig = toml::from_str(s).context("parsing badge config toml")?;
    Ok(cfg.sanitized())
}
