//! Action configuration, optionally loaded from a TOML file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Retrieval settings (TOML).
///
/// Every field has a default, so a missing file or an empty file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ActionConfig {
    /// Base URL of the hosting-provider REST API.
    pub api_url: String,

    /// Items requested per page (provider maximum is 100).
    pub per_page: u32,

    /// Upper bound on pages fetched for one change list.
    pub max_pages: u32,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    pub user_agent: String,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            per_page: 100,
            max_pages: 30,
            request_timeout_secs: 30,
            user_agent: concat!("changed-paths/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ActionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(anyhow!("api_url must be non-empty"));
        }
        if !(1..=100).contains(&self.per_page) {
            return Err(anyhow!("per_page must be between 1 and 100"));
        }
        if self.max_pages == 0 {
            return Err(anyhow!("max_pages must be > 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be > 0"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(anyhow!("user_agent must be non-empty"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Load config from a TOML file.
///
/// `None` yields `ActionConfig::default()`. A path that is given but missing
/// is an error.
pub fn load_config(path: Option<&Path>) -> Result<ActionConfig> {
    let Some(path) = path else {
        let cfg = ActionConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    };
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ActionConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}
