//! Probe target data model
//!
//! A [`Target`] is built once from the raw address string and the session
//! settings, and is read-only for the rest of the session.

use crate::error::{AppError, Result};
use crate::resolver;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Probing protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Http,
    Https,
}

impl Protocol {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Whether probes go through the HTTP client
    pub fn is_http(&self) -> bool {
        matches!(self, Self::Http | Self::Https)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(AppError::unsupported_protocol(s)),
        }
    }
}

/// Repeat, spacing and timeout settings shared by every probe of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Number of probes, 0 means run until stopped
    pub counter: u32,
    /// Minimum spacing between probe invocations
    pub interval: Duration,
    /// Per-probe timeout
    pub timeout: Duration,
}

impl SessionSettings {
    /// Create validated settings; interval and timeout must be non-zero
    pub fn new(counter: u32, interval: Duration, timeout: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(AppError::validation("Interval must be greater than 0"));
        }
        if timeout.is_zero() {
            return Err(AppError::validation("Timeout must be greater than 0"));
        }
        Ok(Self { counter, interval, timeout })
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            counter: crate::defaults::DEFAULT_COUNTER,
            interval: crate::defaults::DEFAULT_INTERVAL,
            timeout: crate::defaults::DEFAULT_TIMEOUT,
        }
    }
}

/// A resolved, protocol-tagged endpoint to probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    protocol: Protocol,
    host: String,
    port: u16,
    remote: String,
    counter: u32,
    interval: Duration,
    timeout: Duration,
}

impl Target {
    /// Resolve `raw` into a target.
    ///
    /// `port_override` replaces whatever port the address carried or
    /// defaulted to. Fails with [`AppError::MalformedAddress`] or
    /// [`AppError::UnsupportedProtocol`] before any probing can start.
    pub fn resolve(raw: &str, port_override: Option<u16>, settings: &SessionSettings) -> Result<Self> {
        let resolved = resolver::resolve(raw)?;

        let port = match port_override {
            Some(0) => return Err(AppError::validation("Port must be between 1 and 65535")),
            Some(port) => port,
            None => resolved.port,
        };

        Ok(Self {
            protocol: resolved.protocol,
            host: resolved.host,
            port,
            remote: raw.to_string(),
            counter: settings.counter,
            interval: settings.interval,
            timeout: settings.timeout,
        })
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The address exactly as the user typed it
    pub fn remote(&self) -> &str {
        &self.remote
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `protocol://host:port`, used in probe lines
    pub fn address(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    /// URL requested by HTTP probes: the remote URL with the resolved port
    pub fn request_url(&self) -> Result<Url> {
        if !self.protocol.is_http() {
            return Err(AppError::validation(format!(
                "No request URL for {} target {}", self.protocol, self
            )));
        }

        // Url reads zero-padded octets as octal; the resolver reads them as decimal
        let source = match resolver::decimal_ipv4(&self.host) {
            Some(ip) => self.remote.replacen(&self.host, &ip.to_string(), 1),
            None => self.remote.clone(),
        };
        let mut url = Url::parse(&source)?;
        url.set_port(Some(self.port))
            .map_err(|_| AppError::validation(format!("Cannot set port {} on {}", self.port, url)))?;
        Ok(url)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SessionSettings {
        SessionSettings::default()
    }

    #[test]
    fn test_protocol_round_trip() {
        for protocol in [Protocol::Tcp, Protocol::Http, Protocol::Https] {
            assert_eq!(protocol.to_string().parse::<Protocol>().unwrap(), protocol);
        }
    }

    #[test]
    fn test_protocol_parse_is_case_insensitive() {
        assert_eq!("HTTPS".parse::<Protocol>().unwrap(), Protocol::Https);
        assert_eq!("Tcp".parse::<Protocol>().unwrap(), Protocol::Tcp);
    }

    #[test]
    fn test_protocol_rejects_unknown() {
        let err = "ftp".parse::<Protocol>().unwrap_err();
        assert!(matches!(err, AppError::UnsupportedProtocol(ref p) if p == "ftp"));
    }

    #[test]
    fn test_session_settings_reject_zero_durations() {
        assert!(SessionSettings::new(4, Duration::ZERO, Duration::from_secs(1)).is_err());
        assert!(SessionSettings::new(4, Duration::from_secs(1), Duration::ZERO).is_err());
        assert!(SessionSettings::new(0, Duration::from_millis(1), Duration::from_millis(1)).is_ok());
    }

    #[test]
    fn test_default_settings() {
        let settings = SessionSettings::default();
        assert_eq!(settings.counter, 4);
        assert_eq!(settings.interval, Duration::from_secs(1));
        assert_eq!(settings.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_target_resolve_carries_settings() {
        let settings = SessionSettings::new(0, Duration::from_millis(250), Duration::from_secs(2)).unwrap();
        let target = Target::resolve("tcp://db.internal.net:5432", None, &settings).unwrap();

        assert_eq!(target.protocol(), Protocol::Tcp);
        assert_eq!(target.host(), "db.internal.net");
        assert_eq!(target.port(), 5432);
        assert_eq!(target.remote(), "tcp://db.internal.net:5432");
        assert_eq!(target.counter(), 0);
        assert_eq!(target.interval(), Duration::from_millis(250));
        assert_eq!(target.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_target_display_is_host_port() {
        let target = Target::resolve("https://example.com/health", None, &settings()).unwrap();
        assert_eq!(target.to_string(), "example.com:443");
        assert_eq!(target.address(), "https://example.com:443");
    }

    #[test]
    fn test_port_override() {
        let target = Target::resolve("10.0.0.5", Some(22), &settings()).unwrap();
        assert_eq!(target.port(), 22);

        let err = Target::resolve("10.0.0.5", Some(0), &settings()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_resolve_errors_propagate() {
        assert!(matches!(
            Target::resolve("not a host!!", None, &settings()),
            Err(AppError::MalformedAddress(_))
        ));
        assert!(matches!(
            Target::resolve("ftp://host.com", None, &settings()),
            Err(AppError::UnsupportedProtocol(_))
        ));
    }

    #[test]
    fn test_request_url_keeps_path_and_sets_port() {
        let target = Target::resolve("https://example.com:8443/health?deep=1", None, &settings()).unwrap();
        let url = target.request_url().unwrap();
        assert_eq!(url.as_str(), "https://example.com:8443/health?deep=1");

        let target = Target::resolve("http://example.com/status", Some(8080), &settings()).unwrap();
        assert_eq!(target.request_url().unwrap().as_str(), "http://example.com:8080/status");
    }

    #[test]
    fn test_request_url_for_default_port() {
        let target = Target::resolve("https://example.com", None, &settings()).unwrap();
        assert_eq!(target.request_url().unwrap().as_str(), "https://example.com/");
    }

    #[test]
    fn test_request_url_reads_padded_octets_as_decimal() {
        let target = Target::resolve("http://192.168.001.010:8080/x", None, &settings()).unwrap();
        assert_eq!(target.to_string(), "192.168.001.010:8080");
        assert_eq!(target.request_url().unwrap().as_str(), "http://192.168.1.10:8080/x");

        let target = Target::resolve("http://10.0.0.008/", None, &settings()).unwrap();
        assert_eq!(target.request_url().unwrap().as_str(), "http://10.0.0.8/");

        let target = Target::resolve("https://10.0.0.5/health", None, &settings()).unwrap();
        assert_eq!(target.request_url().unwrap().as_str(), "https://10.0.0.5/health");
    }

    #[test]
    fn test_request_url_rejected_for_tcp() {
        let target = Target::resolve("example.com:22", None, &settings()).unwrap();
        assert!(target.request_url().is_err());
    }
}
