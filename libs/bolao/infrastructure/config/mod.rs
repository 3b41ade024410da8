use crate::domain::CurrentUser;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Environment variables read on top of the YAML file
pub mod env_vars {
    pub const API_BASE_URL: &str = "VITE_API_BASE_URL";
    pub const API_BASE_URL_FALLBACK: &str = "API_BASE_URL";
    pub const AUTH_TOKEN: &str = "BOLAO_AUTH_TOKEN";
    pub const USER_ID: &str = "BOLAO_USER_ID";
    pub const FAVORITE_TEAM: &str = "BOLAO_FAVORITE_TEAM";
}

/// Live notifications configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub stream: StreamSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    /// Status log interval of the binary
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Bearer token from .env (not in YAML)
    #[serde(skip)]
    pub auth_token: Option<String>,

    /// Signed-in user from .env (not in YAML)
    #[serde(skip)]
    pub user: Option<CurrentUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_events_path")]
    pub events_path: String,
    #[serde(default = "default_preferences_path")]
    pub preferences_path: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            events_path: default_events_path(),
            preferences_path: default_preferences_path(),
        }
    }
}

/// Event stream connection policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamSettings {
    /// Delay between reconnection attempts
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Reconnection attempts before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Delay before the first connect after startup
    #[serde(default = "default_initial_connect_delay_ms")]
    pub initial_connect_delay_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            retry_delay_ms: default_retry_delay_ms(),
            max_retries: default_max_retries(),
            initial_connect_delay_ms: default_initial_connect_delay_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Window during which a repeated match status is suppressed
    #[serde(default = "default_dedup_window_secs")]
    pub dedup_window_secs: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            dedup_window_secs: default_dedup_window_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_events_path() -> String {
    "/matches/events".to_string()
}

fn default_preferences_path() -> String {
    "/users/me/notification-preferences".to_string()
}

fn default_retry_delay_ms() -> u64 {
    3000
}

fn default_max_retries() -> usize {
    5
}

fn default_initial_connect_delay_ms() -> u64 {
    3000
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_dedup_window_secs() -> u64 {
    300
}

fn default_heartbeat_interval() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            stream: StreamSettings::default(),
            notifications: NotificationSettings::default(),
            heartbeat_interval_secs: default_heartbeat_interval(),
            log_level: default_log_level(),
            auth_token: None,
            user: None,
        }
    }
}

impl LiveConfig {
    /// Load configuration from YAML file, then apply environment overrides
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let mut config: LiveConfig = serde_yaml::from_str(&yaml_content)?;

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a YAML file
    pub fn from_env() -> Result<Self> {
        let mut config = LiveConfig::default();
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(base_url) =
            non_empty(env_vars::API_BASE_URL).or_else(|| non_empty(env_vars::API_BASE_URL_FALLBACK))
        {
            info!("Overriding API base URL from environment variable");
            self.api.base_url = base_url;
        }

        if let Some(token) = non_empty(env_vars::AUTH_TOKEN) {
            self.auth_token = Some(token);
        }

        if let Some(id) = non_empty(env_vars::USER_ID) {
            self.user = Some(CurrentUser::new(id, non_empty(env_vars::FAVORITE_TEAM)));
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base_url = reqwest::Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::ValidationError(format!("api.base_url is not a valid URL: {}", e))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(
                "api.base_url must use http or https".to_string(),
            ));
        }

        if self.api.events_path.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api.events_path cannot be empty".to_string(),
            ));
        }

        if self.stream.retry_delay_ms == 0 {
            return Err(ConfigError::ValidationError(
                "stream.retry_delay_ms must be greater than 0".to_string(),
            ));
        }

        if self.stream.connect_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "stream.connect_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.notifications.dedup_window_secs == 0 {
            return Err(ConfigError::ValidationError(
                "notifications.dedup_window_secs must be greater than 0".to_string(),
            ));
        }

        if self.heartbeat_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "heartbeat_interval_secs must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    pub fn events_url(&self) -> String {
        join_url(&self.api.base_url, &self.api.events_path)
    }

    pub fn preferences_url(&self) -> String {
        join_url(&self.api.base_url, &self.api.preferences_path)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.stream.retry_delay_ms)
    }

    pub fn initial_connect_delay(&self) -> Duration {
        Duration::from_millis(self.stream.initial_connect_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.stream.connect_timeout_ms)
    }

    pub fn dedup_window(&self) -> Duration {
        Duration::from_secs(self.notifications.dedup_window_secs)
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Events URL: {}", self.events_url());
        info!("  Preferences URL: {}", self.preferences_url());
        info!(
            "  Retry: {} attempts every {}ms",
            self.stream.max_retries, self.stream.retry_delay_ms
        );
        info!("  Initial connect delay: {}ms", self.stream.initial_connect_delay_ms);
        info!("  Dedup window: {}s", self.notifications.dedup_window_secs);
        info!("  Log level: {}", self.log_level);
        info!(
            "  Auth token: {}",
            if self.auth_token.is_some() { "set" } else { "not set" }
        );
        match &self.user {
            Some(user) => info!(
                "  User: {} (favorite team: {})",
                user.id,
                user.favorite_team.as_deref().unwrap_or("none")
            ),
            None => info!("  User: not set"),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
