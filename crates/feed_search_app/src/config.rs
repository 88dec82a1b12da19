use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use feed_search_engine::FetchSettings;
use log::LevelFilter;
use search_logging::LogDestination;
use serde::{Deserialize, Serialize};

pub(crate) const CONFIG_FILENAME: &str = "feed_search.ron";

/// Optional settings read from `feed_search.ron`. Missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub search_term: String,
    pub feeds_path: PathBuf,
    pub log_destination: LogDestination,
    pub verbose: bool,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_feed_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            search_term: "president".to_string(),
            feeds_path: PathBuf::from("data/data.json"),
            log_destination: LogDestination::Terminal,
            verbose: false,
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_feed_bytes: fetch.max_bytes,
        }
    }
}

impl AppConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_feed_bytes,
            ..FetchSettings::default()
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

/// Loads the config at `path`; a missing file yields the defaults.
pub(crate) fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config {path:?}"));
        }
    };

    ron::from_str(&content).with_context(|| format!("failed to parse config {path:?}"))
}
