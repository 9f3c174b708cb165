//! Probe outcome data model

use crate::types::ProbeStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Terminal outcome of one probe attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// How the probe ended
    pub status: ProbeStatus,

    /// Time from starting the attempt until it ended
    pub elapsed: Duration,

    /// Optional annotation from a successful probe (e.g. `HTTP/1.1 200 OK`)
    pub diagnostic: Option<String>,

    /// Reason the probe failed
    pub error_message: Option<String>,

    /// When the probe ended
    pub timestamp: DateTime<Utc>,
}

impl ProbeOutcome {
    /// Create a successful outcome
    pub fn success(elapsed: Duration, diagnostic: Option<String>) -> Self {
        Self {
            status: ProbeStatus::Success,
            elapsed,
            diagnostic,
            error_message: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a failed outcome
    pub fn failed(elapsed: Duration, error_message: String) -> Self {
        Self {
            status: ProbeStatus::Failed,
            elapsed,
            diagnostic: None,
            error_message: Some(error_message),
            timestamp: Utc::now(),
        }
    }

    /// Create a timeout outcome
    pub fn timeout(timeout_duration: Duration) -> Self {
        Self {
            status: ProbeStatus::Timeout,
            elapsed: timeout_duration,
            diagnostic: None,
            error_message: Some(format!(
                "No response within {}",
                crate::stats::format_duration(timeout_duration)
            )),
            timestamp: Utc::now(),
        }
    }

    /// Create a connection-refused outcome
    pub fn refused(elapsed: Duration) -> Self {
        Self {
            status: ProbeStatus::Refused,
            elapsed,
            diagnostic: None,
            error_message: Some("Connection refused".to_string()),
            timestamp: Utc::now(),
        }
    }

    /// Check if this probe was successful
    pub fn is_successful(&self) -> bool {
        self.status.is_success()
    }

    /// Elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / 1_000_000.0
    }
}
