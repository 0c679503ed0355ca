//! # Scope Rule Model
//!
//! Bug bounty programs publish their scope in whatever notation they like.
//! A rule line is classified, in this order, as:
//! * **Ip**: a single address (e.g., `192.168.0.1`, `::1`).
//! * **Cidr**: a network block (e.g., `192.168.0.0/24`).
//! * **SingleWildcardDomain**: a `*.` prefix and no other `*` (e.g., `*.example.com`).
//! * **MultiWildcardPattern**: any other `*` (e.g., `a*b.example.com`, `*.example.*`),
//!   compiled into a regex.
//! * **ExactDomain**: everything else (e.g., `example.com`, `https://app.example.com/`).

use std::net::IpAddr;
use std::str::FromStr;

use ipnetwork::IpNetwork;
use regex::Regex;

use crate::error::ScopeError;
use crate::network::target::{Target, extract_host};

pub const WILDCARD_PREFIX: &str = "*.";

/// The comparable form of a rule, one variant per notation.
#[derive(Clone, Debug)]
pub enum RuleKind {
    Ip(IpAddr),
    Cidr(IpNetwork),
    /// Holds the domain with the `*.` marker stripped.
    SingleWildcardDomain(String),
    MultiWildcardPattern(Regex),
    ExactDomain(String),
}

/// A classified scope line. Immutable once parsed.
#[derive(Clone, Debug)]
pub struct ScopeRule {
    raw: String,
    kind: RuleKind,
}

impl ScopeRule {
    pub fn parse(raw: &str) -> Result<Self, ScopeError> {
        let kind: RuleKind = classify(raw)?;
        Ok(Self {
            raw: raw.to_string(),
            kind,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    /// Whether the rule was written with a leading `*.`.
    pub fn has_wildcard_prefix(&self) -> bool {
        self.raw.starts_with(WILDCARD_PREFIX)
    }

    /// Decides whether the rule covers `target`.
    ///
    /// With `wildcard` set, domain rules are a plain suffix test on the host
    /// string, **not** a comparison of dot-separated labels. Splitting on dots
    /// breaks on multi-label public suffixes such as `example.gov.br`. The
    /// price is that `evilexample.com` is accepted by `*.example.com`.
    pub fn matches(&self, target: &Target, wildcard: bool) -> bool {
        match &self.kind {
            RuleKind::Ip(addr) => target.ip == Some(*addr),
            RuleKind::Cidr(network) => target.ip.is_some_and(|ip| network.contains(ip)),
            RuleKind::SingleWildcardDomain(domain) | RuleKind::ExactDomain(domain) if wildcard => {
                target.host.ends_with(domain.as_str())
            }
            RuleKind::SingleWildcardDomain(domain) | RuleKind::ExactDomain(domain) => {
                target.host == *domain
            }
            RuleKind::MultiWildcardPattern(pattern) => {
                !target.is_ip() && pattern.is_match(&target.host)
            }
        }
    }
}

impl FromStr for ScopeRule {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn classify(raw: &str) -> Result<RuleKind, ScopeError> {
    if let Ok(addr) = raw.parse::<IpAddr>() {
        return Ok(RuleKind::Ip(addr));
    }

    if let Some(network) = parse_cidr(raw) {
        return Ok(RuleKind::Cidr(network));
    }

    let wildcards: usize = raw.matches('*').count();

    if wildcards == 1 {
        if let Some(domain) = raw.strip_prefix(WILDCARD_PREFIX) {
            let host: String =
                extract_host(domain).ok_or_else(|| ScopeError::InvalidHost(raw.to_string()))?;
            return Ok(RuleKind::SingleWildcardDomain(host));
        }
    }

    if wildcards > 0 {
        return compile_wildcards(raw).map(RuleKind::MultiWildcardPattern);
    }

    let host: String = extract_host(raw).ok_or_else(|| ScopeError::InvalidHost(raw.to_string()))?;

    // `https://10.0.0.1/` only reveals itself as an address once the URL parts are gone
    match host.parse::<IpAddr>() {
        Ok(addr) => Ok(RuleKind::Ip(addr)),
        Err(_) => Ok(RuleKind::ExactDomain(host)),
    }
}

/// Parses CIDR notation like "192.168.1.0/24" or "2001:db8::/32".
fn parse_cidr(s: &str) -> Option<IpNetwork> {
    if !s.contains('/') {
        return None;
    }
    IpNetwork::from_str(s).ok()
}

/// Turns `a*b.example.com` into the regex `a.*b\.example\.com`.
///
/// Only `.` is escaped. Any other regex syntax in the rule is passed through as written.
pub fn compile_wildcards(raw: &str) -> Result<Regex, ScopeError> {
    let pattern: String = raw.replace('.', "\\.").replace('*', ".*");
    Regex::new(&pattern).map_err(|source| ScopeError::InvalidPattern {
        rule: raw.to_string(),
        source,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
