//! Configuration module for user-console
//!
//! Supports configuration via file and environment variables.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    /// Base URL of the user-management API, e.g. `http://localhost:7071`.
    /// Empty means not configured; every operation short-circuits with a
    /// user-facing message until a URL is set.
    #[serde(default)]
    pub url: String,
}

/// Connectivity watch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Whether the background reachability watch runs in TUI mode
    #[serde(default = "default_monitor_enabled")]
    pub enabled: bool,
    /// Seconds between reachability probes
    #[serde(default = "default_monitor_interval")]
    pub interval_secs: u64,
}

fn default_monitor_enabled() -> bool {
    true
}

fn default_monitor_interval() -> u64 {
    10
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: default_monitor_enabled(),
            interval_secs: default_monitor_interval(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Remote API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Connectivity watch configuration
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> anyhow::Result<Self> {
        // Try to load .env file (ignore if not found)
        let _ = dotenvy::dotenv();

        let mut config = config::Config::builder();

        // Add default config
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Try to load from config file if it exists
        if std::path::Path::new("config.toml").exists() {
            config = config.add_source(config::File::with_name("config").required(false));
        }

        // Override with environment variables (prefixed with USER_CONSOLE_)
        config = config.add_source(
            config::Environment::with_prefix("USER_CONSOLE")
                .separator("_")
                .try_parsing(true),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).or_else(|_| serde_json::from_str(&contents))?;
        Ok(config)
    }
}

/// Shared application state that holds runtime configuration
///
/// The API base URL is the one mutable piece of session state: set at
/// startup, updated by the URL-edit handler, never persisted.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<AppConfig>>,
}

impl SharedConfig {
    /// Create a new shared configuration
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Get a read-only copy of the configuration
    pub fn get(&self) -> AppConfig {
        self.inner.read().clone()
    }

    /// Current API base URL
    pub fn api_url(&self) -> String {
        self.inner.read().api.url.clone()
    }

    /// Update the API base URL
    pub fn set_api_url(&self, url: String) {
        self.inner.write().api.url = url;
    }

    /// Update the entire configuration
    pub fn update(&self, config: AppConfig) {
        *self.inner.write() = config;
    }
}
