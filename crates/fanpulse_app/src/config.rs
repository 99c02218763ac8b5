use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use fanpulse_core::DEFAULT_PAGE_SIZE;
use fanpulse_engine::{
    GatewaySettings, DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL, ENV_API_KEY,
    ENV_BASE_URL, ENV_TIMEOUT_SECS,
};
use fanpulse_logging::{pulse_info, pulse_warn, LogDestination};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

pub const CONFIG_FILENAME: &str = "fanpulse.ron";

/// Contents of `fanpulse.ron`. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    /// `terminal`, `file` or `both`.
    pub log_destination: String,
    pub poll_interval_secs: u64,
    pub page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout_secs: 30,
            log_destination: "terminal".to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        let config: AppConfig =
            ron::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Atomically writes this config as pretty RON.
    pub fn save(&self, path: &Path) -> Result<PathBuf> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(self, pretty).context("serializing config")?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(path)
            .map_err(|err| err.error)
            .with_context(|| format!("writing {}", path.display()))?;
        pulse_info!("wrote config to {}", path.display());
        Ok(path.to_path_buf())
    }

    pub fn log_destination(&self) -> LogDestination {
        LogDestination::from_name(&self.log_destination).unwrap_or_else(|| {
            pulse_warn!(
                "unknown log destination {:?}, using terminal",
                self.log_destination
            );
            LogDestination::Terminal
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Gateway settings from this file, with environment variables winning.
    pub fn gateway_settings(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<GatewaySettings> {
        let settings = GatewaySettings::from_lookup(|key| {
            env(key).or_else(|| match key {
                ENV_BASE_URL => Some(self.base_url.clone()),
                ENV_API_KEY => Some(self.api_key.clone()),
                ENV_TIMEOUT_SECS => Some(self.timeout_secs.to_string()),
                _ => None,
            })
        })?;
        Ok(settings)
    }
}
