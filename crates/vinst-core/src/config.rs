use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::FetchOptions;

/// Transfer limits for binary and manifest downloads (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Seconds allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Upper bound in seconds for a whole transfer.
    pub timeout_secs: u64,
    /// Abort when throughput stays below this many bytes/sec...
    pub low_speed_limit_bytes: u32,
    /// ...for this many seconds.
    pub low_speed_time_secs: u64,
    /// Maximum number of redirects to follow.
    pub max_redirections: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 600,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            max_redirections: 10,
        }
    }
}

impl FetchConfig {
    pub fn to_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            low_speed_limit: self.low_speed_limit_bytes,
            low_speed_time: Duration::from_secs(self.low_speed_time_secs),
            max_redirections: self.max_redirections,
        }
    }
}

/// Global configuration loaded from `~/.config/vinst/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VinstConfig {
    /// Cache root override. When unset the XDG cache dir (`~/.cache/vinst`) is used.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Hold an advisory lock for the whole fetch/verify/install sequence.
    #[serde(default = "default_lock")]
    pub lock: bool,
    /// Optional transfer limits; if missing, built-in defaults are used.
    #[serde(default)]
    pub fetch: Option<FetchConfig>,
}

fn default_lock() -> bool {
    true
}

impl Default for VinstConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            lock: true,
            fetch: None,
        }
    }
}

impl VinstConfig {
    /// Fetch options from the `[fetch]` table, or defaults.
    pub fn fetch_options(&self) -> FetchOptions {
        self.fetch.clone().unwrap_or_default().to_options()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vinst")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VinstConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VinstConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: VinstConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
