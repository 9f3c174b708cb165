//! Output formatting for probe lines and the final report
//!
//! Probe lines may be colored; the report is always the plain rendering of
//! the session statistics.

mod colored;
mod formatter;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{failure_reason, probe_time, PlainFormatter, ProbeFormatter};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool) -> Box<dyn ProbeFormatter> {
        if enable_color {
            Box::new(ColoredFormatter::new())
        } else {
            Box::new(PlainFormatter::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProbeOutcome, SessionSettings, Target};
    use std::time::Duration;

    #[test]
    fn test_factory_plain_output_has_no_escapes() {
        let target = Target::resolve("10.0.0.5:22", None, &SessionSettings::default()).unwrap();
        let outcome = ProbeOutcome::success(Duration::from_millis(1), None);

        let line = OutputFormatterFactory::create_formatter(false).format_probe(1, &target, &outcome);
        assert_eq!(line, "Ping tcp://10.0.0.5:22 - Connected - seq=1 time=1ms");
    }
}
