//! Core formatting trait and the plain text formatter

use crate::{
    models::{ProbeOutcome, Target},
    stats::{format_duration, PingResult},
};
use std::time::Duration;

/// Formats what a session prints to stdout
pub trait ProbeFormatter: Send + Sync {
    /// One line per probe, without trailing newline
    fn format_probe(&self, seq: u32, target: &Target, outcome: &ProbeOutcome) -> String;

    /// The final statistics block
    fn format_report(&self, result: &PingResult) -> String {
        result.render()
    }
}

/// Probe round-trip time truncated to microseconds, e.g. `12.3ms`
pub fn probe_time(elapsed: Duration) -> String {
    let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
    format_duration(Duration::from_micros(micros))
}

/// Why a probe failed, as shown in its line
pub fn failure_reason(outcome: &ProbeOutcome) -> &str {
    outcome
        .error_message
        .as_deref()
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| outcome.status.description())
}

/// Plain text formatter for pipes and log files
#[derive(Debug, Default, Clone)]
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ProbeFormatter for PlainFormatter {
    fn format_probe(&self, seq: u32, target: &Target, outcome: &ProbeOutcome) -> String {
        if !outcome.is_successful() {
            return format!(
                "Ping {} - {} - seq={}",
                target.address(),
                failure_reason(outcome),
                seq
            );
        }

        let mut line = format!(
            "Ping {} - {} - seq={} time={}",
            target.address(),
            outcome.status.description(),
            seq,
            probe_time(outcome.elapsed)
        );
        if let Some(diagnostic) = outcome.diagnostic.as_deref().filter(|d| !d.is_empty()) {
            line.push_str(&format!(" [{}]", diagnostic));
        }
        line
    }
}
