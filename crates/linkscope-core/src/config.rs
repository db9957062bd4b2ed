use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::resolver::DEFAULT_MAX_HOPS;

/// Global configuration loaded from `~/.config/linkscope/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkscopeConfig {
    /// Maximum redirect hops followed per resolution.
    pub max_hops: usize,
    /// Connect timeout for each probe request, in seconds.
    pub connect_timeout_secs: u64,
    /// Total timeout for each probe request, in seconds.
    pub request_timeout_secs: u64,
    /// User-Agent sent with probe requests.
    pub user_agent: String,
    /// Optional replacement for the built-in shortener host list.
    #[serde(default)]
    pub shorteners: Option<Vec<String>>,
}

impl Default for LinkscopeConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            connect_timeout_secs: 10,
            request_timeout_secs: 15,
            user_agent: concat!("linkscope/", env!("CARGO_PKG_VERSION")).to_string(),
            shorteners: None,
        }
    }
}

impl LinkscopeConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("linkscope")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LinkscopeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LinkscopeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<LinkscopeConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: LinkscopeConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    if cfg.max_hops == 0 {
        anyhow::bail!("max_hops must be at least 1 ({})", path.display());
    }
    Ok(cfg)
}
