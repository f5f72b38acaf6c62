//! Proxy data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Proxy protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyType {
    Http,
    Https,
    Socks4,
    Socks5,
}

impl ProxyType {
    /// Every supported protocol, in the order they are crawled
    pub const ALL: [ProxyType; 4] = [
        ProxyType::Http,
        ProxyType::Https,
        ProxyType::Socks4,
        ProxyType::Socks5,
    ];
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyType::Http => write!(f, "http"),
            ProxyType::Https => write!(f, "https"),
            ProxyType::Socks4 => write!(f, "socks4"),
            ProxyType::Socks5 => write!(f, "socks5"),
        }
    }
}

/// A proxy proposed for validation.
///
/// Identity is the whole `(host, port, protocol)` triple, so the same
/// `host:port` discovered under two protocols is validated twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Candidate {
    pub host: String,
    pub port: u16,
    pub protocol: ProxyType,
}

impl Candidate {
    pub fn new(host: impl Into<String>, port: u16, protocol: ProxyType) -> Self {
        Self {
            host: host.into(),
            port,
            protocol,
        }
    }

    /// Proxy URL used when routing requests through this candidate
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// Outcome of a bare TCP connect attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reachability {
    pub reachable: bool,
    pub latency_ms: u64,
}

/// Outcome of an application-level check through the proxy
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProbeOutcome {
    pub ok: bool,
    pub egress_ip: Option<String>,
}

impl ProbeOutcome {
    pub fn failed() -> Self {
        Self::default()
    }

    pub fn ok(egress_ip: Option<String>) -> Self {
        Self {
            ok: true,
            egress_ip,
        }
    }
}

/// Final verdict for a single candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub candidate: Candidate,
    pub reachable: bool,
    pub latency_ms: Option<u64>,
    pub egress_ip: Option<String>,
    /// `None` when no probe was run for this candidate
    pub probed_ok: Option<bool>,
}

impl ValidationResult {
    pub fn new(candidate: Candidate, reachability: Reachability) -> Self {
        Self {
            candidate,
            reachable: reachability.reachable,
            latency_ms: Some(reachability.latency_ms),
            egress_ip: None,
            probed_ok: None,
        }
    }

    pub fn with_probe(mut self, outcome: ProbeOutcome) -> Self {
        self.probed_ok = Some(outcome.ok);
        self.egress_ip = outcome.egress_ip;
        self
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable
    }
}
