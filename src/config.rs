use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{self, cache, content, intervals, limits};

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "HUBFEED_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub api: ApiConfig,

    pub content: ContentConfig,

    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    pub log_format: LogFormat,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Site root; the REST namespace is appended to it.
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,

    pub user_agent: String,

    /// How long a cached response stays valid (default: 300)
    pub cache_ttl_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            request_timeout_seconds: limits::REQUEST_TIMEOUT_SECONDS,
            user_agent: format!("hubfeed/{}", env!("CARGO_PKG_VERSION")),
            cache_ttl_seconds: cache::TTL_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Cover image used when a post has no featured media.
    pub placeholder_image: String,

    /// Author shown when a post carries no embedded author.
    pub default_author: String,

    pub words_per_minute: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            placeholder_image: content::PLACEHOLDER_IMAGE.to_string(),
            default_author: constants::SITE_NAME.to_string(),
            words_per_minute: content::WORDS_PER_MINUTE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub page_size: u32,

    /// Pause before each "load more" fetch, in milliseconds (default: 500)
    pub load_more_delay_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: limits::DEFAULT_PAGE_SIZE,
            load_more_delay_ms: u64::try_from(intervals::LOAD_MORE_DELAY.as_millis())
                .unwrap_or(500),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = None;
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            info!("Using API URL from {}", API_URL_ENV);
            self.api.base_url = url.trim().to_string();
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("hubfeed").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".hubfeed").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Writes the default config to `./config.toml` unless one exists.
    /// Returns whether a file was created.
    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("API base URL cannot be empty");
        }

        url::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;

        if self.api.request_timeout_seconds == 0 {
            anyhow::bail!("Request timeout must be > 0");
        }

        if self.api.cache_ttl_seconds == 0 {
            anyhow::bail!("Cache TTL must be > 0");
        }

        if self.feed.page_size == 0 {
            anyhow::bail!("Feed page size must be > 0");
        }

        if self.content.words_per_minute == 0 {
            anyhow::bail!("Words per minute must be > 0");
        }

        Ok(())
    }
}
