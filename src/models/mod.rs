//! Data models and structures for tcping

pub mod config;
pub mod metrics;
pub mod target;

// Re-export main model types
pub use config::Config;
pub use metrics::ProbeOutcome;
pub use target::{Protocol, SessionSettings, Target};
