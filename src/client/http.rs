//! HTTP and HTTPS GET prober

use super::{is_connection_refused, Prober};
use crate::{
    defaults::MAX_REDIRECTS,
    error::{AppError, Result},
    models::{ProbeOutcome, Target},
};
use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Probes by issuing a GET and timing it until the response headers arrive
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Create a prober whose client gives up after `request_timeout`
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(format!("{}/{}", crate::PKG_NAME, crate::VERSION))
            .use_rustls_tls()
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn classify_error(error: &reqwest::Error, elapsed: Duration, target: &Target) -> ProbeOutcome {
        if error.is_timeout() {
            ProbeOutcome::timeout(target.timeout())
        } else if is_connection_refused(error) {
            ProbeOutcome::refused(elapsed)
        } else {
            ProbeOutcome::failed(elapsed, error.to_string())
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &Target) -> ProbeOutcome {
        let url = match target.request_url() {
            Ok(url) => url,
            Err(e) => return ProbeOutcome::failed(Duration::ZERO, e.to_string()),
        };

        let start = Instant::now();
        let response = match timeout(target.timeout(), self.client.get(url).send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Self::classify_error(&e, start.elapsed(), target),
            Err(_) => return ProbeOutcome::timeout(target.timeout()),
        };
        let elapsed = start.elapsed();

        let status = response.status();
        if status.is_success() {
            let diagnostic = format!("{:?} {}", response.version(), status);
            ProbeOutcome::success(elapsed, Some(diagnostic))
        } else {
            ProbeOutcome::failed(elapsed, format!("HTTP status {}", status.as_u16()))
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
