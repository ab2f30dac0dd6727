//! Layered configuration: defaults, an optional TOML file, then `CAS_CLEANER__*` env vars

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cleaner::MediaServer;

/// Environment variable holding the config file path
pub const CONFIG_PATH_ENV: &str = "CAS_CLEANER_CONFIG";
/// Config file used when [`CONFIG_PATH_ENV`] is unset
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "CAS_CLEANER";

/// Problems found while loading configuration.
///
/// Collected instead of logged so they can be reported once logging is up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigIssue {
    #[error("Config file {} not found, using defaults", .0.display())]
    MissingFile(PathBuf),

    #[error("Cleaner enabled but CAS {missing} is missing, disabling")]
    CleanerIncomplete { missing: &'static str },
}

impl ConfigIssue {
    /// Whether the issue changes runtime behaviour
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::CleanerIncomplete { .. })
    }
}

/// Configuration together with the issues found while loading it
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub issues: Vec<ConfigIssue>,
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cleaner: CleanerConfig,
    pub notifier: NotifierConfig,
    pub log: LogConfig,
}

/// HTTP listener for incoming webhooks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Task cleaner settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub enabled: bool,
    /// Send cleanup and watch-progress notifications
    pub notify: bool,
    /// Media server whose webhooks are accepted
    pub server: MediaServer,
    /// CAS base URL, e.g. `http://192.168.1.2:3000/`
    pub host: String,
    pub api_key: String,
    /// Wait before querying CAS, giving it time to pick up the new item
    pub delay_seconds: u64,
    /// Verbose per-task logging
    pub debug_log: bool,
}

impl CleanerConfig {
    /// Normalize the host and disable the cleaner when required fields are missing
    pub fn validate(&mut self) -> Result<(), ConfigIssue> {
        self.host = crate::cleaner::normalize_host(&self.host);

        if !self.enabled {
            return Ok(());
        }

        let missing = match (self.host.is_empty(), self.api_key.is_empty()) {
            (false, false) => return Ok(()),
            (true, false) => "host",
            (false, true) => "api_key",
            (true, true) => "host and api_key",
        };

        self.enabled = false;
        Err(ConfigIssue::CleanerIncomplete { missing })
    }
}

/// Notification back-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Log,
    Telegram,
    Webhook,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub kind: NotifierKind,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    /// Target of the generic JSON webhook
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter level, overridden by `RUST_LOG`
    pub level: String,
    /// Write daily-rolling log files here when set
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path` (if it exists) and the process environment
    pub fn load(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        Self::load_with_env(path, Self::environment())
    }

    /// Load configuration from `path` (if it exists) and the given environment source
    pub fn load_with_env(
        path: Option<&Path>,
        environment: Environment,
    ) -> Result<LoadedConfig, ConfigError> {
        let mut issues = Vec::new();
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                issues.push(ConfigIssue::MissingFile(path.to_path_buf()));
            }
            builder = builder.add_source(File::from(path).required(false));
        }

        let mut config: Self = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        if let Err(issue) = config.cleaner.validate() {
            issues.push(issue);
        }

        Ok(LoadedConfig { config, issues })
    }

    /// `CAS_CLEANER__SECTION__KEY` environment source
    #[must_use]
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// Resolve the config file path from [`CONFIG_PATH_ENV`]
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
    }
}
