//! Configuration data model and validation

use crate::cli::parse_duration;
use crate::logging::LogFormat;
use crate::models::target::SessionSettings;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable names read by [`Config::merge_from_env`]
pub mod env_keys {
    pub const COUNTER: &str = "TCPING_COUNTER";
    pub const INTERVAL: &str = "TCPING_INTERVAL";
    pub const TIMEOUT: &str = "TCPING_TIMEOUT";
    pub const ENABLE_COLOR: &str = "ENABLE_COLOR";
    pub const LOG_FORMAT: &str = "TCPING_LOG_FORMAT";
}

const MAX_INTERVAL: Duration = Duration::from_secs(3600);
const MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of probes to send, 0 = until interrupted
    #[serde(default = "default_counter")]
    pub counter: u32,

    /// Minimum spacing between probes in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Per-probe timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Enable colored probe lines
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,

    /// Log output format
    #[serde(default)]
    pub log_format: Option<LogFormat>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            counter: default_counter(),
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
            log_format: None,
        }
    }
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(AppError::config("Interval must be greater than 0"));
        }

        if self.interval() > MAX_INTERVAL {
            return Err(AppError::config("Interval cannot exceed 1 hour"));
        }

        if self.timeout_ms == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout() > MAX_TIMEOUT {
            return Err(AppError::config("Timeout cannot exceed 300 seconds"));
        }

        Ok(())
    }

    /// Settings applied to every probe of the session
    pub fn session_settings(&self) -> Result<SessionSettings> {
        SessionSettings::new(self.counter, self.interval(), self.timeout())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_lookup(|key| std::env::var(key).ok())
    }

    /// Merge values supplied by `lookup` (keyed like environment variables)
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(counter) = lookup(env_keys::COUNTER) {
            self.counter = counter.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::COUNTER, counter, e)))?;
        }

        if let Some(interval) = lookup(env_keys::INTERVAL) {
            self.interval_ms = duration_millis(&parse_duration(interval.trim())
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::INTERVAL, interval, e)))?);
        }

        if let Some(timeout) = lookup(env_keys::TIMEOUT) {
            self.timeout_ms = duration_millis(&parse_duration(timeout.trim())
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::TIMEOUT, timeout, e)))?);
        }

        if let Some(enable_color) = lookup(env_keys::ENABLE_COLOR) {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::ENABLE_COLOR, enable_color, e)))?;
        }

        if let Some(log_format) = lookup(env_keys::LOG_FORMAT) {
            self.log_format = Some(log_format.trim().parse()?);
        }

        Ok(())
    }
}

/// Whole milliseconds of `duration`, at least 1 for any non-zero duration
pub(crate) fn duration_millis(duration: &Duration) -> u64 {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    if millis == 0 && !duration.is_zero() {
        1
    } else {
        millis
    }
}

// Default value functions for serde
fn default_counter() -> u32 {
    crate::defaults::DEFAULT_COUNTER
}

fn default_interval_ms() -> u64 {
    duration_millis(&crate::defaults::DEFAULT_INTERVAL)
}

fn default_timeout_ms() -> u64 {
    duration_millis(&crate::defaults::DEFAULT_TIMEOUT)
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
