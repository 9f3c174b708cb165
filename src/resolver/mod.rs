//! Target address resolution
//!
//! Turns a user supplied address such as `https://example.com:8443/health`,
//! `10.0.0.5` or `tcp://db.internal.net:5432` into a protocol, host and port.
//! The address is parsed piece by piece:
//!
//! ```text
//! [scheme "://"] host [":" port] ["/" path]
//! ```
//!
//! * `scheme` is one of `tcp`, `http`, `https`, `ftp`, `ftps` and defaults to `tcp`.
//! * `host` is a DNS-style name whose last label is alphabetic, or a dotted-quad IPv4 address.
//! * `port` defaults to 443 for `https` and 80 for everything else.
//! * `path` is accepted and discarded.
//!
//! No DNS lookup happens here; hostnames are handed to the prober verbatim.

use crate::error::{AppError, Result};
use crate::models::target::Protocol;
use std::net::Ipv4Addr;


/// Schemes the address shape recognises. Only the first three are probeable.
const SCHEMES: &[&str] = &["tcp", "http", "https", "ftp", "ftps"];

const DEFAULT_SCHEME: &str = "tcp";
const HTTPS_DEFAULT_PORT: u16 = 443;
const FALLBACK_PORT: u16 = 80;

/// Raw pieces of a matched address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriParts {
    /// Lowercase scheme, `tcp` when the address had none
    pub schema: String,
    pub host: String,
    pub port: u16,
}

/// Protocol-validated address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
}

/// Match `uri` against the address shape.
///
/// Returns `None` when the input is not an address at all. The scheme is not
/// validated against the probeable protocols here, so `ftp://host.com`
/// matches.
pub fn check_uri(uri: &str) -> Option<UriParts> {
    let (scheme, rest) = parse_scheme(uri);
    let (host, rest) = parse_host(rest)?;
    let (port, rest) = parse_port(rest)?;
    parse_path(rest)?;

    let schema = scheme.unwrap_or(DEFAULT_SCHEME);
    let port = port.unwrap_or(if schema == "https" { HTTPS_DEFAULT_PORT } else { FALLBACK_PORT });

    Some(UriParts {
        schema: schema.to_string(),
        host: host.to_string(),
        port,
    })
}

/// Resolve `raw` into a probeable protocol, host and port
pub fn resolve(raw: &str) -> Result<ResolvedAddress> {
    let parts = check_uri(raw).ok_or_else(|| AppError::malformed_address(raw))?;
    let protocol: Protocol = parts.schema.parse()?;

    Ok(ResolvedAddress {
        protocol,
        host: parts.host,
        port: parts.port,
    })
}

/// Strip a recognised `scheme://` prefix. Unknown prefixes are left in place
/// and later fail the host parser.
fn parse_scheme(input: &str) -> (Option<&'static str>, &str) {
    if let Some((prefix, rest)) = input.split_once("://") {
        if let Some(scheme) = SCHEMES.iter().find(|s| s.eq_ignore_ascii_case(prefix)) {
            return (Some(*scheme), rest);
        }
    }
    (None, input)
}

fn parse_host(input: &str) -> Option<(&str, &str)> {
    let end = input.find([':', '/']).unwrap_or(input.len());
    let (host, rest) = input.split_at(end);

    if is_hostname(host) || is_ipv4(host) {
        Some((host, rest))
    } else {
        None
    }
}

/// `None` means the input is malformed; `Some((None, _))` means no port was given.
fn parse_port(input: &str) -> Option<(Option<u16>, &str)> {
    let Some(after_colon) = input.strip_prefix(':') else {
        return Some((None, input));
    };

    let digits_end = after_colon
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after_colon.len());
    if digits_end == 0 {
        return None;
    }

    let (digits, rest) = after_colon.split_at(digits_end);
    match digits.parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(port) => Some((Some(port), rest)),
    }
}

fn parse_path(input: &str) -> Option<()> {
    if input.is_empty() {
        return Some(());
    }
    if input.starts_with('/') && input.chars().all(is_path_char) {
        Some(())
    } else {
        None
    }
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-._?,'/\\+&;%$#=~".contains(c)
}

/// At least two labels of `[A-Za-z0-9_-]`, the last one alphabetic and two or more letters long
fn is_hostname(host: &str) -> bool {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let (tld, rest) = match labels.split_last() {
        Some(split) => split,
        None => return false,
    };

    let labels_ok = rest.iter().all(|label| {
        !label.is_empty()
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    });
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    labels_ok && tld_ok
}

/// Dotted-quad IPv4. Two-digit octets may not have a leading zero and the
/// first octet may not be a lone `0`.
fn is_ipv4(host: &str) -> bool {
    let octets: Vec<&str> = host.split('.').collect();
    if octets.len() != 4 {
        return false;
    }

    octets.iter().enumerate().all(|(index, octet)| {
        if octet.is_empty() || octet.len() > 3 || !octet.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        if octet.len() == 2 && octet.starts_with('0') {
            return false;
        }
        if index == 0 && *octet == "0" {
            return false;
        }
        octet.parse::<u16>().map(|value| value <= 255).unwrap_or(false)
    })
}

/// Decimal reading of a dotted-quad host, leading zeros included
pub fn decimal_ipv4(host: &str) -> Option<Ipv4Addr> {
    if !is_ipv4(host) {
        return None;
    }
    let mut octets = [0u8; 4];
    for (slot, octet) in octets.iter_mut().zip(host.split('.')) {
        *slot = octet.parse().ok()?;
    }
    Some(Ipv4Addr::from(octets))
}
