//! TCP connect prober

use super::Prober;
use crate::models::{ProbeOutcome, Target};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::time::Instant;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Probes by opening a TCP connection; the socket is closed right away
#[derive(Debug, Default, Clone)]
pub struct TcpProber;

impl TcpProber {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, target: &Target) -> ProbeOutcome {
        let start = Instant::now();
        let connect = TcpStream::connect((target.host(), target.port()));

        match timeout(target.timeout(), connect).await {
            Ok(Ok(stream)) => {
                let elapsed = start.elapsed();
                drop(stream);
                ProbeOutcome::success(elapsed, None)
            }
            Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => {
                ProbeOutcome::refused(start.elapsed())
            }
            Ok(Err(e)) => ProbeOutcome::failed(start.elapsed(), e.to_string()),
            Err(_) => ProbeOutcome::timeout(target.timeout()),
        }
    }

    fn name(&self) -> &'static str {
        "tcp"
    }
}
