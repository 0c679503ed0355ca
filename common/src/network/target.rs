//! # Target Model
//!
//! A single candidate asset pulled from recon output.
//!
//! Input lines come in every shape recon tools produce:
//! * A bare hostname (e.g., `api.example.com`).
//! * A host with a port (e.g., `api.example.com:8443`).
//! * A full URL (e.g., `https://user@api.example.com/login?next=/`).
//! * An IPv4/IPv6 literal, with or without brackets and port.
//!
//! All of them are reduced to the host (or IP) they point at, which is the
//! only part scope rules ever look at.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use url::{Host, Url};

use crate::error::ScopeError;

/// A normalized target. Immutable once parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    /// The line exactly as it was supplied.
    pub raw: String,
    /// Host or IP literal with scheme, credentials, path, query and port removed.
    pub host: String,
    /// Set when `host` is an IP literal.
    pub ip: Option<IpAddr>,
}

impl Target {
    /// Normalizes `raw` into a target.
    ///
    /// Lines without a scheme are retried with `https://` in front, so
    /// `example.com:8080` and `10.0.0.1` are accepted as well.
    pub fn parse(raw: &str) -> Result<Self, ScopeError> {
        let host: String =
            extract_host(raw).ok_or_else(|| ScopeError::InvalidTarget(raw.to_string()))?;
        let ip: Option<IpAddr> = host.parse::<IpAddr>().ok();

        Ok(Self {
            raw: raw.to_string(),
            host,
            ip,
        })
    }

    pub fn is_ip(&self) -> bool {
        self.ip.is_some()
    }

    /// The value written to the result sets.
    pub fn output(&self, hostnames_only: bool) -> &str {
        if hostnames_only { &self.host } else { &self.raw }
    }
}

impl FromStr for Target {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Returns the portless host of `raw`, or `None` if it doesn't look like a network locator.
pub fn extract_host(raw: &str) -> Option<String> {
    // Bare IPv6 literals only parse as URLs inside brackets
    if let Ok(addr) = raw.parse::<IpAddr>() {
        return Some(addr.to_string());
    }
    if let Ok(addr) = raw.parse::<SocketAddr>() {
        return Some(addr.ip().to_string());
    }

    host_of(raw).or_else(|| host_of(&format!("https://{raw}")))
}

fn host_of(candidate: &str) -> Option<String> {
    let url: Url = Url::parse(candidate).ok()?;
    let host: String = match url.host()? {
        Host::Domain(domain) => domain.to_string(),
        Host::Ipv4(addr) => ipv4_as_written(candidate, addr)?,
        Host::Ipv6(addr) => addr.to_string(),
    };

    if host.is_empty() { None } else { Some(host) }
}

/// The URL parser also reads `192.168.1`, `3232235521` and `0x7f.1` as IPv4.
/// Only a dotted quad as written counts as an address; anything else stays a hostname.
fn ipv4_as_written(candidate: &str, addr: Ipv4Addr) -> Option<String> {
    let written: &str = authority_host(candidate)?;
    match written.parse::<Ipv4Addr>() {
        Ok(parsed) if parsed == addr => Some(addr.to_string()),
        _ => Some(written.to_lowercase()),
    }
}

/// Host text of `scheme://user@host:port/path` as it appears in the input.
fn authority_host(candidate: &str) -> Option<&str> {
    let (_, rest) = candidate.split_once(':')?;
    let rest: &str = rest.trim_start_matches(['/', '\\']);
    let end: usize = rest.find(['/', '\\', '?', '#']).unwrap_or(rest.len());
    let authority: &str = &rest[..end];
    let host_port: &str = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    let host: &str = host_port.split_once(':').map_or(host_port, |(h, _)| h);

    if host.is_empty() { None } else { Some(host) }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
