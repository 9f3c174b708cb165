//! Type definitions and aliases

use std::time::Duration;
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Terminal status of a single probe attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeStatus {
    /// Connection established (TCP) or 2xx received (HTTP/HTTPS)
    Success,
    /// Probe failed for any other reason (DNS, non-2xx status, I/O)
    Failed,
    /// No answer within the probe timeout
    Timeout,
    /// The remote actively refused the connection
    Refused,
}

impl ProbeStatus {
    /// Short human-readable description used in probe lines
    pub fn description(&self) -> &'static str {
        match self {
            Self::Success => "Connected",
            Self::Failed => "Failed",
            Self::Timeout => "Timeout",
            Self::Refused => "Connection refused",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Latency classification used for color coding probe lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LatencyLevel {
    /// Below 50ms
    Fast,
    /// 50ms to 300ms
    Moderate,
    /// 300ms and above
    Slow,
}

impl LatencyLevel {
    /// Classify a round-trip time
    pub fn from_duration(duration: Duration) -> Self {
        let ms = duration.as_secs_f64() * 1000.0;
        if ms < 50.0 {
            Self::Fast
        } else if ms < 300.0 {
            Self::Moderate
        } else {
            Self::Slow
        }
    }
}
