//! Centralized configuration management for category-desk

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default backend address
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Notification timing
    pub notifications: NotificationConfig,
    /// Directory scanned for spreadsheets to upload
    pub upload_dir: PathBuf,
    /// Log file written by the tracing appender
    pub log_file: PathBuf,
}

/// Backend API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `http://localhost:5000`
    pub base_url: String,
    /// User agent string
    pub user_agent: String,
}

/// How long notifications stay visible
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub form_delay_ms: u64,
    pub table_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            user_agent: "category-desk/0.1.0".to_string(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            form_delay_ms: 4000,
            table_delay_ms: 3000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            notifications: NotificationConfig::default(),
            upload_dir: PathBuf::from("."),
            log_file: PathBuf::from("category-desk.log"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let api = ApiConfig {
            base_url: lookup("CATEGORY_DESK_API_URL").unwrap_or(defaults.api.base_url),
            user_agent: lookup("CATEGORY_DESK_USER_AGENT").unwrap_or(defaults.api.user_agent),
        };

        let notifications = NotificationConfig {
            form_delay_ms: parse_var(&lookup, "CATEGORY_DESK_FORM_NOTICE_MS")?
                .unwrap_or(defaults.notifications.form_delay_ms),
            table_delay_ms: parse_var(&lookup, "CATEGORY_DESK_TABLE_NOTICE_MS")?
                .unwrap_or(defaults.notifications.table_delay_ms),
        };

        let upload_dir = lookup("CATEGORY_DESK_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let log_file = lookup("CATEGORY_DESK_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        Ok(Config {
            api,
            notifications,
            upload_dir,
            log_file,
        })
    }

    /// Replace the base URL, e.g. from a command-line flag
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api.base_url = base_url.to_string();
        self
    }

    /// Notification delay for the entry form
    pub fn form_notice_delay(&self) -> Duration {
        Duration::from_millis(self.notifications.form_delay_ms)
    }

    /// Notification delay for the category table
    pub fn table_notice_delay(&self) -> Duration {
        Duration::from_millis(self.notifications.table_delay_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow::anyhow!(
                "API base URL must use http or https: {}",
                self.api.base_url
            ));
        }

        if !self.upload_dir.is_dir() {
            return Err(anyhow::anyhow!(
                "Upload directory does not exist: {}",
                self.upload_dir.display()
            ));
        }

        Ok(())
    }
}

/// Parse an optional variable as a specific type
fn parse_var<F, T>(lookup: &F, var_name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match lookup(var_name) {
        Some(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        None => Ok(None),
    }
}
