//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::config::duration_millis,
    models::Config,
    stats::format_duration,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Build the configuration: defaults, then `.env`, then the process
    /// environment, then CLI arguments
    pub fn parse(&self) -> Result<Config> {
        EnvManager::load_env_file(self.cli.debug)?;
        let mut config = Config::default();
        config.merge_from_env()?;
        self.finish(config)
    }

    /// Same layering as [`parse`](Self::parse) with `lookup` standing in for
    /// the environment and no `.env` file
    #[cfg(test)]
    pub fn parse_with<F>(&self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        config.merge_from_lookup(lookup)?;
        self.finish(config)
    }

    fn finish(&self, mut config: Config) -> Result<Config> {
        self.apply_cli_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(counter) = self.cli.counter {
            config.counter = counter;
        }

        if let Some(interval) = self.cli.interval {
            config.interval_ms = duration_millis(&interval);
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_ms = duration_millis(&timeout);
        }

        if let Some(enable_color) = self.cli.color_override() {
            config.enable_color = enable_color;
        }

        if let Some(log_format) = self.cli.log_format {
            config.log_format = Some(log_format);
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let counter = if config.counter == 0 {
        "unbounded".to_string()
    } else {
        config.counter.to_string()
    };

    let summary = [
        format!("Counter: {}", counter),
        format!("Interval: {}", format_duration(config.interval())),
        format!("Timeout: {}", format_duration(config.timeout())),
        format!("Color Output: {}", config.enable_color),
        format!("Log Format: {}", config.log_format.map_or("console", |f| f.as_str())),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ];

    summary.join("\n")
}
