//! Centralized configuration management for infludash

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote API configuration
    pub api: ApiConfig,
    /// Where the bearer token is persisted between runs
    pub credentials_path: PathBuf,
    /// List screen configuration
    pub list: ListConfig,
}

/// Remote API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every resource path is appended to
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Lifetime of a stored login token
    pub token_expiry_days: u32,
}

/// List screen configuration
#[derive(Debug, Clone)]
pub struct ListConfig {
    /// Rows requested per page
    pub page_size: u32,
    /// How long a success banner stays visible (seconds)
    pub notice_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000/api".to_string(),
            timeout_seconds: 30,
            user_agent: "infludash/0.1.0".to_string(),
            token_expiry_days: 7,
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            notice_seconds: 3,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            credentials_path: PathBuf::from("./infludash-credentials.json"),
            list: ListConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let api = ApiConfig {
            base_url: lookup("INFLUDASH_API_URL").unwrap_or(defaults.api.base_url),
            timeout_seconds: parse_var(&lookup, "INFLUDASH_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.api.timeout_seconds),
            user_agent: lookup("INFLUDASH_USER_AGENT").unwrap_or(defaults.api.user_agent),
            token_expiry_days: parse_var(&lookup, "INFLUDASH_TOKEN_EXPIRY_DAYS")?
                .unwrap_or(defaults.api.token_expiry_days),
        };

        let credentials_path = lookup("INFLUDASH_CREDENTIALS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.credentials_path);

        let list = ListConfig {
            page_size: parse_var(&lookup, "INFLUDASH_PAGE_SIZE")?
                .unwrap_or(defaults.list.page_size),
            notice_seconds: parse_var(&lookup, "INFLUDASH_NOTICE_SECONDS")?
                .unwrap_or(defaults.list.notice_seconds),
        };

        Ok(Config {
            api,
            credentials_path,
            list,
        })
    }

    /// Replace the API base URL, e.g. from a command-line flag
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api.base_url = base_url.to_string();
        self
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    /// Get success banner lifetime as Duration
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.list.notice_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API base URL must start with http:// or https://: {}",
                self.api.base_url
            ));
        }

        if self.api.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be at least one second"));
        }

        if self.list.page_size == 0 {
            return Err(anyhow::anyhow!("Page size must be greater than zero"));
        }

        if let Some(parent) = self.credentials_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Cannot create credentials directory: {}", parent.display())
                })?;
            }
        }

        Ok(())
    }
}

/// Helper function to parse a looked-up variable as a specific type
fn parse_var<T, F>(lookup: &F, var_name: &str) -> Result<Option<T>>
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
