use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::core::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_DVR_IP: &str = "192.168.86.34:59090";
pub const DEFAULT_EPISODES: u32 = 5;
pub const DEFAULT_POLL_INTERVAL_MINUTES: u64 = 1;
/// One week.
pub const MAX_POLL_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

pub const DVR_IP_ENV: &str = "DVR_IP";
pub const WEBHOOK_URL_ENV: &str = "DISCORD_WEBHOOK_URL";

// ---------- Discord ----------
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct DiscordConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub notify_on_cleanup: bool,
    #[serde(default = "default_true")]
    pub notify_on_startup: bool,
    #[serde(default = "default_true")]
    pub notify_on_error: bool,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            notify_on_cleanup: true,
            notify_on_startup: true,
            notify_on_error: true,
        }
    }
}

// ---------- Root ----------
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_dvr_ip")]
    pub dvr_ip: String,
    #[serde(default = "default_episodes")]
    pub default_episodes: u32,
    #[serde(default = "default_poll_interval_minutes")]
    pub poll_interval_minutes: u64,
    /// Exact show title -> episodes to keep. A value of 0 deletes every episode.
    #[serde(default)]
    pub show_overrides: BTreeMap<String, u32>,
    #[serde(default)]
    pub discord: DiscordConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dvr_ip: default_dvr_ip(),
            default_episodes: DEFAULT_EPISODES,
            poll_interval_minutes: DEFAULT_POLL_INTERVAL_MINUTES,
            show_overrides: BTreeMap::new(),
            discord: DiscordConfig::default(),
        }
    }
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_minutes.saturating_mul(60))
    }

    pub fn show_override(&self, title: &str) -> Option<u32> {
        self.show_overrides.get(title).copied()
    }

    fn normalize(mut self) -> Self {
        if self.poll_interval_minutes == 0 {
            warn!("[config] poll_interval_minutes must be > 0, using 1");
            self.poll_interval_minutes = 1;
        } else if self.poll_interval_minutes > MAX_POLL_INTERVAL_MINUTES {
            warn!(
                "[config] poll_interval_minutes {} is too large, using {}",
                self.poll_interval_minutes, MAX_POLL_INTERVAL_MINUTES
            );
            self.poll_interval_minutes = MAX_POLL_INTERVAL_MINUTES;
        }
        self
    }
}

fn default_true() -> bool {
    true
}

fn default_dvr_ip() -> String {
    DEFAULT_DVR_IP.to_string()
}

const fn default_episodes() -> u32 {
    DEFAULT_EPISODES
}

const fn default_poll_interval_minutes() -> u64 {
    DEFAULT_POLL_INTERVAL_MINUTES
}

// ---------- Loader ----------

/// Reads and parses a config file. Missing keys take their defaults.
pub fn read_file(path: &Path) -> Result<Config, ConfigError> {
    let txt = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let config: Config = serde_json::from_str(&txt).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(config.normalize())
}

/// Resolves the effective configuration. Never fails: an absent or broken file
/// falls back to the built-in defaults as a whole. `dvr_ip_env` is applied last
/// regardless of how the file load went.
pub fn load_with_env(path: &Path, dvr_ip_env: Option<String>) -> Config {
    let mut config = match read_file(path) {
        Ok(config) => {
            info!("[config] loaded {}", path.display());
            debug!("[config] {:?}", config);
            config
        }
        Err(ConfigError::NotFound { .. }) => {
            warn!(
                "[config] config file {} not found, using defaults",
                path.display()
            );
            Config::default()
        }
        Err(e) => {
            error!("[config] {}", e);
            warn!("[config] using default configuration");
            Config::default()
        }
    };

    if let Some(ip) = dvr_ip_env.filter(|ip| !ip.trim().is_empty()) {
        info!("[config] using {} from environment: {}", DVR_IP_ENV, ip);
        config.dvr_ip = ip;
    }

    config
}

/// Loads the config file and applies the `DVR_IP` environment override.
pub fn load(path: &Path) -> Config {
    load_with_env(path, std::env::var(DVR_IP_ENV).ok())
}
