//! Configuration types for package-fetch
//!
//! Values the download policy depends on (size threshold, external executable,
//! storage API version, retry budget) live here rather than in constants so
//! that hosts and tests can run the same code with alternate settings.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest connection count the external downloader accepts
const MAX_CONNECTIONS: u32 = 16;

/// Retry behavior for the single-stream HTTP request
///
/// `max_attempts` counts retries after the first attempt, so the default
/// issues at most three requests spaced by a fixed half second.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first (default: 2)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (default: 500 ms)
    #[serde(default = "default_retry_delay", with = "duration_ms_serde")]
    pub initial_delay: Duration,

    /// Upper bound for the delay between retries (default: 500 ms)
    #[serde(default = "default_retry_delay", with = "duration_ms_serde")]
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each retry (default: 1.0, fixed delay)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: false)
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_retry_delay(),
            max_delay: default_retry_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: false,
        }
    }
}

/// Package fetch configuration
///
/// # Example
///
/// ```
/// use package_fetch::config::FetchConfig;
///
/// let config = FetchConfig::from_json_str(r#"{ "connections": 8 }"#).unwrap();
/// assert_eq!(config.connections, 8);
/// assert_eq!(config.downloader_executable, "aria2c");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Declared sizes strictly above this use the multi-connection downloader (default: 100 MiB)
    #[serde(default = "default_multi_connection_threshold")]
    pub multi_connection_threshold: u64,

    /// External multi-connection downloader executable (default: "aria2c")
    #[serde(default = "default_downloader_executable")]
    pub downloader_executable: String,

    /// Connections used by the external downloader (default: 12)
    #[serde(default = "default_connections")]
    pub connections: u32,

    /// Header carrying the storage API version on authenticated requests
    #[serde(default = "default_api_version_header")]
    pub api_version_header: String,

    /// Storage API version the backend expects with bearer tokens (default: "2019-12-12")
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Host suffix identifying storage-blob URLs (default: ".blob.core.windows.net")
    #[serde(default = "default_blob_host_suffix")]
    pub blob_host_suffix: String,

    /// Destination directory (default: the system temporary directory)
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    /// Hard deadline for the unauthenticated accessibility probe (default: 5 seconds)
    #[serde(default = "default_probe_timeout", with = "duration_ms_serde")]
    pub probe_timeout: Duration,

    /// Retry policy for the single-stream request
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            multi_connection_threshold: default_multi_connection_threshold(),
            downloader_executable: default_downloader_executable(),
            connections: default_connections(),
            api_version_header: default_api_version_header(),
            api_version: default_api_version(),
            blob_host_suffix: default_blob_host_suffix(),
            download_dir: None,
            probe_timeout: default_probe_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

impl FetchConfig {
    /// Parse a configuration from JSON; omitted fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FetchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Directory downloads are written into
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.downloader_executable.trim().is_empty() {
            return Err(Error::config(
                "downloader_executable",
                "downloader executable must not be empty",
            ));
        }
        if self.connections == 0 || self.connections > MAX_CONNECTIONS {
            return Err(Error::config(
                "connections",
                format!("connections must be between 1 and {MAX_CONNECTIONS}"),
            ));
        }
        if self.api_version_header.trim().is_empty() || self.api_version.trim().is_empty() {
            return Err(Error::config(
                "api_version",
                "storage API version header and value must not be empty",
            ));
        }
        if reqwest::header::HeaderName::from_bytes(self.api_version_header.as_bytes()).is_err() {
            return Err(Error::config(
                "api_version_header",
                format!("'{}' is not a valid header name", self.api_version_header),
            ));
        }
        if reqwest::header::HeaderValue::from_str(&self.api_version).is_err() {
            return Err(Error::config(
                "api_version",
                format!("'{}' is not a valid header value", self.api_version.escape_debug()),
            ));
        }
        if self.probe_timeout.is_zero() {
            return Err(Error::config(
                "probe_timeout",
                "probe timeout must be greater than zero",
            ));
        }
        if !self.retry.backoff_multiplier.is_finite() || self.retry.backoff_multiplier < 1.0 {
            return Err(Error::config(
                "retry.backoff_multiplier",
                "backoff multiplier must be a finite number of at least 1.0",
            ));
        }
        if self.retry.max_delay < self.retry.initial_delay {
            return Err(Error::config(
                "retry.max_delay",
                "max delay must not be shorter than the initial delay",
            ));
        }
        Ok(())
    }
}

fn default_max_attempts() -> u32 {
    2
}

fn default_retry_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_multi_connection_threshold() -> u64 {
    100 * 1024 * 1024
}

fn default_downloader_executable() -> String {
    "aria2c".to_string()
}

fn default_connections() -> u32 {
    12
}

fn default_api_version_header() -> String {
    "x-ms-version".to_string()
}

fn default_api_version() -> String {
    "2019-12-12".to_string()
}

fn default_blob_host_suffix() -> String {
    ".blob.core.windows.net".to_string()
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(5)
}

// Duration serialization helper (milliseconds)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
