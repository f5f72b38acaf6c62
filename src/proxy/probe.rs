//! Application-level checks sent through a candidate proxy

use crate::proxy::models::{Candidate, ProbeOutcome};
use crate::proxy::network::Network;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default URL that echoes the caller's address as `{"origin": "..."}`
pub const DEFAULT_PROBE_URL: &str = "https://httpbin.org/ip";

/// Which probe, if any, runs for reachable candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMode {
    #[default]
    Disabled,
    /// Confirm the target answers 200 through the proxy
    Reachability,
    /// Like `Reachability`, and also record the egress IP the target reports
    Egress,
}

impl ProbeMode {
    /// Egress checking implies a working proxy, so it wins when both are asked for
    pub fn from_flags(probe: bool, egress: bool) -> Self {
        match (probe, egress) {
            (_, true) => ProbeMode::Egress,
            (true, false) => ProbeMode::Reachability,
            (false, false) => ProbeMode::Disabled,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OriginBody {
    origin: String,
}

/// Sends a GET to a fixed target through each candidate
#[derive(Debug, Clone)]
pub struct ProxyProbe {
    target_url: String,
    timeout: Duration,
}

impl ProxyProbe {
    pub fn new(target_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            target_url: target_url.into(),
            timeout,
        }
    }

    /// Run the probe selected by `mode`. `None` when probing is disabled.
    pub async fn run<N: Network + ?Sized>(
        &self,
        network: &N,
        candidate: &Candidate,
        mode: ProbeMode,
    ) -> Option<ProbeOutcome> {
        match mode {
            ProbeMode::Disabled => None,
            ProbeMode::Reachability => Some(if self.reachable_via(network, candidate).await {
                ProbeOutcome::ok(None)
            } else {
                ProbeOutcome::failed()
            }),
            ProbeMode::Egress => Some(match self.egress_ip(network, candidate).await {
                Some(ip) => ProbeOutcome::ok(Some(ip)),
                None => ProbeOutcome::failed(),
            }),
        }
    }

    /// Egress IP reported by the target, or `None` on any failure
    pub async fn egress_ip<N: Network + ?Sized>(
        &self,
        network: &N,
        candidate: &Candidate,
    ) -> Option<String> {
        let body = self.fetch_ok_body(network, candidate).await?;
        match serde_json::from_str::<OriginBody>(&body) {
            Ok(parsed) => Some(parsed.origin),
            Err(e) => {
                debug!(proxy = %candidate, error = %e, "malformed egress response");
                None
            }
        }
    }

    /// Whether the target answers 200 through the proxy
    pub async fn reachable_via<N: Network + ?Sized>(
        &self,
        network: &N,
        candidate: &Candidate,
    ) -> bool {
        self.fetch_ok_body(network, candidate).await.is_some()
    }

    async fn fetch_ok_body<N: Network + ?Sized>(
        &self,
        network: &N,
        candidate: &Candidate,
    ) -> Option<String> {
        let request = network.get_via(candidate, &self.target_url, self.timeout);
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) if response.status == 200 => Some(response.body),
            Ok(Ok(response)) => {
                debug!(proxy = %candidate, status = response.status, "probe rejected");
                None
            }
            Ok(Err(e)) => {
                debug!(proxy = %candidate, error = %e, "probe failed");
                None
            }
            Err(_) => {
                debug!(proxy = %candidate, "probe timed out");
                None
            }
        }
    }
}
