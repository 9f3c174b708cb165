//! Probers: perform one reachability probe against a target

pub mod http;
pub mod tcp;

#[cfg(test)]
mod integration_tests;

pub use http::HttpProber;
pub use tcp::TcpProber;

use crate::{
    error::Result,
    models::{ProbeOutcome, Protocol, Target},
};
use async_trait::async_trait;

/// One probe against a target.
///
/// Probe-level failures are never errors: refused connections, timeouts and
/// bad HTTP statuses all come back as a [`ProbeOutcome`] to be folded.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Execute a single probe and report its outcome
    async fn probe(&self, target: &Target) -> ProbeOutcome;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Creates the prober matching a target's protocol
pub struct ProberFactory;

impl ProberFactory {
    pub fn create(target: &Target) -> Result<Box<dyn Prober>> {
        match target.protocol() {
            Protocol::Tcp => Ok(Box::new(TcpProber::new())),
            Protocol::Http | Protocol::Https => Ok(Box::new(HttpProber::new(target.timeout())?)),
        }
    }
}

/// Whether `error` or anything in its source chain is a refused connection
pub(crate) fn is_connection_refused(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(io_error) = err.downcast_ref::<std::io::Error>() {
            if io_error.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
            // io::Error hides a wrapped error from source()
            if let Some(inner) = io_error.get_ref() {
                current = Some(inner as &(dyn std::error::Error + 'static));
                continue;
            }
        }
        current = err.source();
    }
    false
}
