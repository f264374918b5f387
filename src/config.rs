use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::controller::TooltipSettings;

/// Environment variable that overrides `data_source`.
pub const DATA_SOURCE_ENV: &str = "NEWS_BOARD_DATA";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Path or http(s) URL of the generated data document
    #[serde(default = "default_data_source")]
    pub data_source: String,
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Hover delay before a tooltip appears, in milliseconds
    #[serde(default = "default_tooltip_delay_ms")]
    pub tooltip_delay_ms: u64,
    #[serde(default = "default_tooltip_offset_px")]
    pub tooltip_offset_px: i32,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_data_source() -> String {
    "public/data.json".to_string()
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_tooltip_delay_ms() -> u64 {
    500
}

fn default_tooltip_offset_px() -> i32 {
    15
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: default_data_source(),
            bind: default_bind(),
            static_dir: default_static_dir(),
            tooltip_delay_ms: default_tooltip_delay_ms(),
            tooltip_offset_px: default_tooltip_offset_px(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

/// Where the data document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            DataSource::Url(value.to_string())
        } else {
            DataSource::File(PathBuf::from(value))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Url(url) => f.write_str(url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply an override for the data source, as read from [`DATA_SOURCE_ENV`].
    pub fn with_data_source_override(mut self, value: Option<String>) -> Self {
        if let Some(source) = value.filter(|s| !s.trim().is_empty()) {
            self.data_source = source;
        }
        self
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.data_source)
    }

    pub fn tooltip(&self) -> TooltipSettings {
        TooltipSettings {
            delay: Duration::from_millis(self.tooltip_delay_ms),
            offset: self.tooltip_offset_px,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
