//! Environment variable handling and .env file management

use crate::cli::parse_duration;
use crate::error::{AppError, Result};
use crate::logging::LogFormat;
use crate::models::config::env_keys;
use std::path::Path;
use std::time::Duration;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load the given env file if it exists; variables already set in the
    /// process environment are left untouched
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
                for warning in Self::check_env_file(path)? {
                    eprintln!("Warning: {}", warning);
                }
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            env_keys::COUNTER => {
                value.parse::<u32>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            env_keys::INTERVAL => {
                let interval = parse_duration(value)
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if interval > Duration::from_secs(3600) {
                    return Err(AppError::config(format!("{} cannot exceed 1h, got: {}", key, value)));
                }
            }
            env_keys::TIMEOUT => {
                let timeout = parse_duration(value)
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if timeout > Duration::from_secs(300) {
                    return Err(AppError::config(format!("{} cannot exceed 300s, got: {}", key, value)));
                }
            }
            env_keys::ENABLE_COLOR => {
                value.parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            env_keys::LOG_FORMAT => {
                value.parse::<LogFormat>()?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Supported environment variables as (name, description, example)
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (env_keys::COUNTER, "Number of probes, 0 = until interrupted", "4"),
            (env_keys::INTERVAL, "Spacing between probes (up to 1h)", "1s"),
            (env_keys::TIMEOUT, "Per-probe timeout (up to 300s)", "500ms"),
            (env_keys::ENABLE_COLOR, "Enable colored probe lines", "true"),
            (env_keys::LOG_FORMAT, "Log format: console, json or compact", "json"),
        ]
    }

    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<18} {}\n", var, description));
            help.push_str(&format!("  {:<18} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate the contents of an env file, one warning per bad line
    pub fn check_env_file(path: &Path) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                if let Err(e) = Self::validate_env_var(key.trim(), value) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        Ok(warnings)
    }
}
