//! Colored formatter for terminals

use super::formatter::{failure_reason, probe_time, ProbeFormatter};
use crate::{
    models::{ProbeOutcome, Target},
    types::{LatencyLevel, ProbeStatus},
};
use colored::*;

/// Colors used for probe lines
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::BrightBlack,
        }
    }
}

impl ColorScheme {
    /// Color for a round-trip time
    pub fn latency(&self, level: LatencyLevel) -> Color {
        match level {
            LatencyLevel::Fast => self.success,
            LatencyLevel::Moderate => self.warning,
            LatencyLevel::Slow => self.error,
        }
    }
}

/// Colored formatter implementation
#[derive(Debug, Clone, Default)]
pub struct ColoredFormatter {
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProbeFormatter for ColoredFormatter {
    fn format_probe(&self, seq: u32, target: &Target, outcome: &ProbeOutcome) -> String {
        let address = target.address();
        let seq = format!("seq={}", seq);

        if !outcome.is_successful() {
            let color = match outcome.status {
                ProbeStatus::Timeout => self.color_scheme.warning,
                _ => self.color_scheme.error,
            };
            return format!(
                "Ping {} - {} - {}",
                address.as_str().bold(),
                failure_reason(outcome).color(color),
                seq.as_str().color(self.color_scheme.muted)
            );
        }

        let time = probe_time(outcome.elapsed);
        let time_color = self.color_scheme.latency(LatencyLevel::from_duration(outcome.elapsed));
        let mut line = format!(
            "Ping {} - {} - {} time={}",
            address.as_str().bold(),
            outcome.status.description().color(self.color_scheme.success),
            seq.as_str().color(self.color_scheme.muted),
            time.as_str().color(time_color)
        );
        if let Some(diagnostic) = outcome.diagnostic.as_deref().filter(|d| !d.is_empty()) {
            line.push_str(&format!(" [{}]", diagnostic.dimmed()));
        }
        line
    }
}
