use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upstream maximum for both page and batch sizes
pub const MAX_UPSTREAM_PAGE: usize = 50;

/// Configuration for the playlist analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Video catalog access settings
    pub catalog: CatalogConfig,

    /// Aggregation tuning
    pub aggregation: AggregationConfig,

    /// Study plan limits
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the catalog API
    pub api_base: String,

    /// API key for the catalog
    pub api_key: Option<String>,

    /// Timeout for each catalog request (seconds)
    pub timeout_seconds: u64,

    /// Items requested per enumeration page
    pub page_size: usize,

    /// Video ids per duration lookup
    pub batch_size: usize,

    /// Enumeration stops after this many pages
    pub max_pages: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Duration batches looked up concurrently
    pub concurrent_batches: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Longest start-to-deadline span a plan may cover, in days
    pub max_plan_days: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
            api_key: None,
            timeout_seconds: 15,
            page_size: MAX_UPSTREAM_PAGE,
            batch_size: MAX_UPSTREAM_PAGE,
            max_pages: 200, // 10k items
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            concurrent_batches: num_cpus::get().min(8),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { max_plan_days: 366 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            catalog: CatalogConfig::default(),
            aggregation: AggregationConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the first readable config file, falling back to
    /// defaults, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_paths = [
            "playlist-analyzer.toml",
            "config/playlist-analyzer.toml",
            "/etc/playlist-analyzer/config.toml",
        ];

        let mut config = None;
        for path in &config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(loaded) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        config = Some(loaded);
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        let mut config = config.unwrap_or_default();
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Cannot read {}: {}", path.display(), e))?;
        Ok(toml::from_str(&config_str)?)
    }

    /// Override settings from environment variables
    pub fn apply_env(&mut self) {
        if let Ok(api_key) = std::env::var("YOUTUBE_API_KEY") {
            self.catalog.api_key = Some(api_key);
        }

        if let Ok(port) = std::env::var("PLAYLIST_ANALYZER_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PLAYLIST_ANALYZER_PORT: {}", port),
            }
        }

        if let Ok(api_base) = std::env::var("PLAYLIST_ANALYZER_API_BASE") {
            self.catalog.api_base = api_base;
        }

        if let Ok(timeout) = std::env::var("PLAYLIST_ANALYZER_TIMEOUT") {
            self.catalog.timeout_seconds = timeout.parse().unwrap_or(self.catalog.timeout_seconds);
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.as_ref().display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let catalog = &self.catalog;

        if catalog.page_size == 0 || catalog.page_size > MAX_UPSTREAM_PAGE {
            return Err(anyhow!("page_size must be between 1 and {}", MAX_UPSTREAM_PAGE));
        }

        if catalog.batch_size == 0 || catalog.batch_size > MAX_UPSTREAM_PAGE {
            return Err(anyhow!("batch_size must be between 1 and {}", MAX_UPSTREAM_PAGE));
        }

        if catalog.timeout_seconds == 0 {
            return Err(anyhow!("timeout_seconds must be greater than 0"));
        }

        if catalog.max_pages == 0 {
            return Err(anyhow!("max_pages must be greater than 0"));
        }

        if self.aggregation.concurrent_batches == 0 {
            return Err(anyhow!("concurrent_batches must be greater than 0"));
        }

        if self.schedule.max_plan_days == 0 {
            return Err(anyhow!("max_plan_days must be greater than 0"));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Validate everything needed to reach the catalog
    pub fn validate_for_catalog(&self) -> Result<()> {
        self.validate()?;
        match &self.catalog.api_key {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(anyhow!("API key required (set YOUTUBE_API_KEY)")),
        }
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Playlist Analyzer Configuration:\n\
            - Listen: {}:{}\n\
            - Catalog: {}\n\
            - API key: {}\n\
            - Timeout: {}s\n\
            - Page/batch size: {}/{}\n\
            - Concurrent batches: {}\n\
            - Max plan span: {} days",
            self.server.host,
            self.server.port,
            self.catalog.api_base,
            if self.catalog.api_key.is_some() { "set" } else { "missing" },
            self.catalog.timeout_seconds,
            self.catalog.page_size,
            self.catalog.batch_size,
            self.aggregation.concurrent_batches,
            self.schedule.max_plan_days
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.config.catalog.api_key = Some(api_key);
        self
    }

    pub fn with_max_plan_days(mut self, days: u32) -> Self {
        self.config.schedule.max_plan_days = days;
        self
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.catalog.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_concurrent_batches(mut self, batches: usize) -> Self {
        self.config.aggregation.concurrent_batches = batches;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
