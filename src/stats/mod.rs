//! Probe result aggregation and report rendering
//!
//! [`PingResult`] is the running accumulator of one probing session. Every
//! probe outcome is folded into it exactly once; the final report is a pure
//! function of its state, so rendering mid-session yields a consistent
//! snapshot.

use crate::models::{ProbeOutcome, Target};
use std::fmt::{self, Write as _};
use std::sync::Arc;
use std::time::Duration;


/// Running statistics of one probing session
#[derive(Debug, Clone, PartialEq)]
pub struct PingResult {
    counter: u32,
    success_counter: u32,
    target: Arc<Target>,
    diagnostic_tag: String,
    min_duration: Duration,
    max_duration: Duration,
    total_duration: Duration,
}

impl PingResult {
    /// Zero-valued result for a new session against `target`
    pub fn new(target: Arc<Target>) -> Self {
        Self {
            counter: 0,
            success_counter: 0,
            target,
            diagnostic_tag: String::new(),
            min_duration: Duration::ZERO,
            max_duration: Duration::ZERO,
            total_duration: Duration::ZERO,
        }
    }

    /// Fold one probe outcome into the statistics.
    ///
    /// Every outcome counts as a response; only successes contribute to the
    /// timing figures and the diagnostic tag.
    pub fn fold(&mut self, outcome: &ProbeOutcome) {
        self.counter += 1;

        if !outcome.is_successful() {
            return;
        }

        let elapsed = outcome.elapsed;
        if self.success_counter == 0 {
            self.min_duration = elapsed;
            self.max_duration = elapsed;
        } else {
            self.min_duration = self.min_duration.min(elapsed);
            self.max_duration = self.max_duration.max(elapsed);
        }
        self.success_counter += 1;
        self.total_duration += elapsed;

        if let Some(diagnostic) = outcome.diagnostic.as_deref() {
            if !diagnostic.is_empty() {
                self.diagnostic_tag = diagnostic.to_string();
            }
        }
    }

    /// Mean elapsed time of successful probes, zero when none succeeded
    pub fn average(&self) -> Duration {
        if self.success_counter == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.success_counter
    }

    /// Share of failed probes as a percentage with two decimals, e.g. `"25.00%"`.
    ///
    /// Reported as `"0.00%"` before any probe has been folded.
    pub fn failure_rate(&self) -> String {
        if self.counter == 0 {
            return "0.00%".to_string();
        }
        let failed = f64::from(self.failed_counter());
        format!("{:.2}%", failed * 100.0 / f64::from(self.counter))
    }

    /// Fixed-format multi-line report
    pub fn render(&self) -> String {
        render(self)
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn success_counter(&self) -> u32 {
        self.success_counter
    }

    pub fn failed_counter(&self) -> u32 {
        self.counter - self.success_counter
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Diagnostic of the last successful probe that supplied one
    pub fn diagnostic_tag(&self) -> &str {
        &self.diagnostic_tag
    }

    pub fn min_duration(&self) -> Duration {
        self.min_duration
    }

    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Whether at least one probe succeeded
    pub fn is_reachable(&self) -> bool {
        self.success_counter > 0
    }
}

impl fmt::Display for PingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

/// Render the final report for `result`.
///
/// ```text
/// [diagnostic tag]
/// --- host:port ping statistics ---
/// N responses, S ok, F% failed
/// round-trip min/avg/max = MIN/AVG/MAX
/// ```
pub fn render(result: &PingResult) -> String {
    let mut output = String::new();

    let tag = result.diagnostic_tag();
    if !tag.is_empty() {
        output.push_str(tag);
        if !tag.ends_with('\n') {
            output.push('\n');
        }
    }

    let _ = writeln!(output, "--- {} ping statistics ---", result.target());
    let _ = writeln!(
        output,
        "{} responses, {} ok, {} failed",
        result.counter(),
        result.success_counter(),
        result.failure_rate()
    );
    let _ = write!(
        output,
        "round-trip min/avg/max = {}/{}/{}",
        format_duration(result.min_duration()),
        format_duration(result.average()),
        format_duration(result.max_duration())
    );

    output
}

/// Compact duration text: `0s`, `850ns`, `1.5µs`, `12.345ms`, `1.5s`, `1m30s`, `1h0m0s`
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", decimal(nanos / 1_000, nanos % 1_000, 3));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", decimal(nanos / 1_000_000, nanos % 1_000_000, 6));
    }

    let total_secs = nanos / 1_000_000_000;
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;

    let mut output = String::new();
    if hours > 0 {
        let _ = write!(output, "{}h", hours);
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(output, "{}m", minutes);
    }
    output.push_str(&decimal(seconds, nanos % 1_000_000_000, 9));
    output.push('s');
    output
}

fn decimal(whole: u128, fraction: u128, width: usize) -> String {
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", fraction, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
