use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CmsError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub disclosure: DisclosureConfig,
    pub timings: UiTimings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub content_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            content_dir: PathBuf::from("content"),
        }
    }
}

/// Paging and scroll geometry for the FAQ list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisclosureConfig {
    pub page_size: u32,
    /// How far past the section top the viewport may be before Hide scrolls back.
    pub hide_scroll_threshold: f64,
    pub section_inset: f64,
}

impl Default for DisclosureConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            hide_scroll_threshold: 200.0,
            section_inset: 16.0,
        }
    }
}

/// UI-feel delays. None of these are correctness constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiTimings {
    #[serde(with = "human_duration")]
    pub debounce: Duration,
    #[serde(with = "human_duration")]
    pub hide_transition: Duration,
    #[serde(with = "human_duration")]
    pub modal_clear: Duration,
    #[serde(with = "human_duration")]
    pub scroll_restore_fallback: Duration,
    #[serde(with = "human_duration")]
    pub cleanup_settle: Duration,
}

impl Default for UiTimings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            hide_transition: Duration::from_millis(300),
            modal_clear: Duration::from_millis(300),
            scroll_restore_fallback: Duration::from_millis(50),
            cleanup_settle: Duration::from_secs(1),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.disclosure.page_size == 0 || self.disclosure.page_size > MAX_PAGE_SIZE {
            return Err(CmsError::InvalidArg(format!(
                "page_size must be within 1..={MAX_PAGE_SIZE}"
            )));
        }
        if self.timings.debounce.is_zero() {
            return Err(CmsError::InvalidArg("debounce must be > 0".to_string()));
        }
        if self.disclosure.hide_scroll_threshold < 0.0 {
            return Err(CmsError::InvalidArg(
                "hide_scroll_threshold must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

mod human_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
