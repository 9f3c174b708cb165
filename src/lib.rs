//! tcping
//!
//! Probes a TCP, HTTP or HTTPS endpoint at a fixed interval and summarises
//! the session ping-style: responses, successes, failure rate and
//! min/avg/max round-trip time.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod resolver;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use client::{Prober, ProberFactory};
pub use error::{AppError, Result};
pub use executor::{Session, StopHandle};
pub use models::{Config, ProbeOutcome, Protocol, SessionSettings, Target};
pub use output::{ColoredFormatter, OutputFormatterFactory, PlainFormatter, ProbeFormatter};
pub use stats::PingResult;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Build metadata stamped by build.rs
pub mod build_info {
    pub const BUILD_TIME: Option<&str> = option_env!("BUILD_TIME");
    pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

    /// `tcping 0.2.0 (abc1234, 2026-01-01 00:00:00 UTC)`
    pub fn long_version() -> String {
        let mut extras = Vec::new();
        if let Some(commit) = GIT_COMMIT {
            extras.push(commit);
        }
        if let Some(time) = BUILD_TIME {
            extras.push(time);
        }

        if extras.is_empty() {
            format!("{} {}", super::PKG_NAME, super::VERSION)
        } else {
            format!("{} {} ({})", super::PKG_NAME, super::VERSION, extras.join(", "))
        }
    }
}

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_COUNTER: u32 = 4;
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    /// Redirects followed by HTTP probes
    pub const MAX_REDIRECTS: usize = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_version_mentions_package() {
        let version = build_info::long_version();
        assert!(version.starts_with("tcping "));
        assert!(version.contains(VERSION));
    }
}
