//! Command-line interface module

use crate::config::EnvManager;
use crate::logging::LogFormat;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::time::Duration;

/// tcping - probe a TCP, HTTP or HTTPS endpoint and report ping-style statistics
#[derive(Parser, Debug, Clone)]
#[command(name = "tcping")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Target address, e.g. example.com, 10.0.0.5:22, https://example.com/health
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// Port to probe, overrides the port of the address
    #[arg(value_name = "PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Number of probes to send (0 = until interrupted)
    #[arg(short, long)]
    pub counter: Option<u32>,

    /// Minimum spacing between probes, e.g. 500ms, 1s, 2m
    #[arg(short, long, value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Per-probe timeout, e.g. 500ms, 1s
    #[arg(short, long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Log output format (console, json, compact)
    #[arg(long, value_name = "FORMAT", value_parser = parse_log_format)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Parse the process arguments; `--help` also lists the environment variables
    pub fn parse_args() -> Self {
        let matches = Self::command_with_env_help().get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    pub fn command_with_env_help() -> clap::Command {
        Self::command().after_long_help(EnvManager::display_env_help())
    }

    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.address.trim().is_empty() {
            return Err("Target address cannot be empty".to_string());
        }

        Ok(())
    }

    /// Check if colors should be enabled, `None` when neither flag was given
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(supports_color)
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Command Line:\n");
        summary.push_str(&format!("  Address: {}\n", self.address));
        if let Some(port) = self.port {
            summary.push_str(&format!("  Port override: {}\n", port));
        }
        if let Some(counter) = self.counter {
            summary.push_str(&format!("  Counter: {}\n", counter));
        }
        if let Some(interval) = self.interval {
            summary.push_str(&format!("  Interval: {}\n", crate::stats::format_duration(interval)));
        }
        if let Some(timeout) = self.timeout {
            summary.push_str(&format!("  Timeout: {}\n", crate::stats::format_duration(timeout)));
        }
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        summary
    }
}

/// Parse a duration such as `500ms`, `1s`, `2m`, `1h` or a bare number of seconds
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    // Reject strings with leading + sign or other invalid formats
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);
    if digits.is_empty() {
        return Err(format!("Invalid duration: {}", s));
    }

    let value: u64 = digits
        .parse()
        .map_err(|_| format!("Invalid duration: {}", s))?;

    let duration = match unit {
        "" | "s" => Some(Duration::from_secs(value)),
        "ms" => Some(Duration::from_millis(value)),
        "m" => value.checked_mul(60).map(Duration::from_secs),
        "h" => value.checked_mul(3600).map(Duration::from_secs),
        _ => return Err(format!("Invalid duration unit '{}' in {}", unit, s)),
    }
    .ok_or_else(|| format!("Duration too large: {}", s))?;

    if duration.is_zero() {
        return Err("Duration must be greater than 0".to_string());
    }

    Ok(duration)
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse::<LogFormat>().map_err(|e| e.to_string())
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    // Check for common environment variables that indicate color support
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    // Check for NO_COLOR environment variable
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check for FORCE_COLOR environment variable
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    // On Windows, check for ANSICON or ConEmu
    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    // Default to true on Unix-like systems, false on Windows
    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing_basic() {
        let cli = Cli::parse_from(["tcping", "example.com"]);
        assert_eq!(cli.address, "example.com");
        assert_eq!(cli.port, None);
        assert_eq!(cli.counter, None);
        assert_eq!(cli.interval, None);
        assert_eq!(cli.timeout, None);
        assert!(!cli.verbose);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_parsing_all_options() {
        let cli = Cli::parse_from([
            "tcping",
            "--counter", "10",
            "--interval", "500ms",
            "--timeout", "2s",
            "--no-color",
            "--verbose",
            "--debug",
            "--log-format", "json",
            "https://example.com/health",
            "8443",
        ]);

        assert_eq!(cli.address, "https://example.com/health");
        assert_eq!(cli.port, Some(8443));
        assert_eq!(cli.counter, Some(10));
        assert_eq!(cli.interval, Some(Duration::from_millis(500)));
        assert_eq!(cli.timeout, Some(Duration::from_secs(2)));
        assert!(cli.no_color);
        assert!(cli.verbose);
        assert!(cli.debug);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::parse_from(["tcping", "-c", "0", "-i", "2", "-t", "100ms", "10.0.0.5"]);
        assert_eq!(cli.counter, Some(0));
        assert_eq!(cli.interval, Some(Duration::from_secs(2)));
        assert_eq!(cli.timeout, Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_missing_address_is_rejected() {
        assert!(Cli::try_parse_from(["tcping"]).is_err());
    }

    #[test]
    fn test_port_zero_is_rejected() {
        assert!(Cli::try_parse_from(["tcping", "10.0.0.5", "0"]).is_err());
        assert!(Cli::try_parse_from(["tcping", "10.0.0.5", "70000"]).is_err());
    }

    #[test]
    fn test_invalid_durations() {
        assert!(Cli::try_parse_from(["tcping", "-i", "0", "10.0.0.5"]).is_err());
        assert!(Cli::try_parse_from(["tcping", "-t", "fast", "10.0.0.5"]).is_err());
    }

    #[test]
    fn test_color_conflict() {
        let cli = Cli::parse_from(["tcping", "--color", "--no-color", "example.com"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_color_override() {
        assert_eq!(Cli::parse_from(["tcping", "--color", "a.com"]).color_override(), Some(true));
        assert_eq!(Cli::parse_from(["tcping", "--no-color", "a.com"]).color_override(), Some(false));
        assert_eq!(Cli::parse_from(["tcping", "a.com"]).color_override(), None);
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn test_parse_duration_rejects() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("0").is_err());
        assert!(parse_duration("0ms").is_err());
        assert!(parse_duration("+5").is_err());
        assert!(parse_duration("0x10").is_err());
        assert!(parse_duration("ms").is_err());
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("1.5s").is_err());
    }

    #[test]
    fn test_config_summary() {
        let cli = Cli::parse_from(["tcping", "-c", "3", "example.com", "22"]);
        let summary = cli.get_config_summary();
        assert!(summary.contains("Address: example.com"));
        assert!(summary.contains("Port override: 22"));
        assert!(summary.contains("Counter: 3"));
    }

    #[test]
    fn test_long_help_lists_env_vars() {
        let help = Cli::command_with_env_help().render_long_help().to_string();
        assert!(help.contains("Supported Environment Variables:"));
        assert!(help.contains("TCPING_TIMEOUT"));
    }
}
