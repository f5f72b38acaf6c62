//! Bounded TCP connect probe

use crate::proxy::models::Reachability;
use crate::proxy::network::Network;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Try to connect to `host:port` within `timeout`.
///
/// Refusals, timeouts and every other network error all come back as
/// `reachable: false`; the underlying reason only shows up in the debug log.
/// Latency is the elapsed time of the attempt whatever its outcome.
pub async fn check_reachable<N: Network + ?Sized>(
    network: &N,
    host: &str,
    port: u16,
    timeout: Duration,
) -> Reachability {
    let start = Instant::now();
    let outcome = tokio::time::timeout(timeout, network.connect(host, port)).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let reachable = match outcome {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            debug!(host, port, kind = ?e.kind(), error = %e, "connect failed");
            false
        }
        Err(_) => {
            debug!(host, port, timeout_ms = timeout.as_millis() as u64, "connect timed out");
            false
        }
    };

    Reachability {
        reachable,
        latency_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::models::Candidate;
    use crate::proxy::network::{LiveNetwork, ProxiedResponse};
    use async_trait::async_trait;
    use std::io;
    use tokio::net::TcpListener;

    struct Stalled;

    #[async_trait]
    impl Network for Stalled {
        async fn connect(&self, _host: &str, _port: u16) -> io::Result<()> {
            std::future::pending().await
        }

        async fn get_via(
            &self,
            _candidate: &Candidate,
            _url: &str,
            _timeout: Duration,
        ) -> crate::Result<ProxiedResponse> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_open_port_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let result =
            check_reachable(&LiveNetwork::new(), "127.0.0.1", port, Duration::from_secs(2)).await;
        assert!(result.reachable);
    }

    #[tokio::test]
    async fn test_refused_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result =
            check_reachable(&LiveNetwork::new(), "127.0.0.1", port, Duration::from_secs(2)).await;
        assert!(!result.reachable);
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_unreachable() {
        let result = check_reachable(
            &LiveNetwork::new(),
            "host.invalid",
            8080,
            Duration::from_secs(2),
        )
        .await;
        assert!(!result.reachable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_connect_times_out() {
        let timeout = Duration::from_secs(10);
        let result = check_reachable(&Stalled, "10.0.0.1", 8080, timeout).await;
        assert!(!result.reachable);
        assert!(result.latency_ms >= 10_000);
        assert!(result.latency_ms < 10_100);
    }
}
