//! RON configuration for the driver.
//!
//! A missing file means defaults; a file that does not parse is an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use log::LevelFilter;
use org_logging::{org_info, LogDestination};
use org_settings_core::DEFAULT_DEBOUNCE_MS;
use org_settings_engine::{ApiSettings, EngineSettings};
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_CONFIG_FILENAME: &str = "org_settings.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub api_base_url: String,
    pub org_id: String,
    pub debounce_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_logo_bytes: u64,
    /// `terminal`, `file` or `both`.
    pub log_destination: String,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            api_base_url: api.base_url,
            org_id: String::new(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            connect_timeout_secs: api.connect_timeout.as_secs(),
            request_timeout_secs: api.request_timeout.as_secs(),
            max_logo_bytes: api.max_logo_bytes,
            log_destination: "file".to_string(),
            log_file: PathBuf::from("./org_settings.log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.org_id.trim().is_empty() {
            bail!("org_id must be set in the config file");
        }
        if self.debounce_ms == 0 {
            bail!("debounce_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            org_id: self.org_id.clone(),
            debounce_interval: Duration::from_millis(self.debounce_ms),
            api: ApiSettings {
                base_url: self.api_base_url.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                max_logo_bytes: self.max_logo_bytes,
                ..ApiSettings::default()
            },
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        LogDestination::parse(&self.log_destination, &self.log_file)
            .unwrap_or_else(|| LogDestination::File(self.log_file.clone()))
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

pub(crate) fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading config {}", path.display()));
        }
    };
    ron::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}

pub(crate) fn save_config(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    let pretty = ron::ser::PrettyConfig::new();
    let content =
        ron::ser::to_string_pretty(config, pretty).context("serializing config")?;
    fs::write(path, content).with_context(|| format!("writing config {}", path.display()))?;
    org_info!("Wrote config to {:?}", path);
    Ok(())
}
