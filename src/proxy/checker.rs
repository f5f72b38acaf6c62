//! Proxy checker module: the worker pool that validates a candidate set

use crate::proxy::models::{Candidate, ValidationResult};
use crate::proxy::network::{LiveNetwork, Network};
use crate::proxy::probe::{ProbeMode, ProxyProbe, DEFAULT_PROBE_URL};
use crate::proxy::queue::WorkQueue;
use crate::proxy::reachability::check_reachable;
use crate::proxy::store::ResultStore;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Default timeout for each connect or probe in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of workers
const DEFAULT_CONCURRENCY: usize = 32;

/// Configuration for proxy checker
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Timeout for each connect attempt and each probe request
    pub timeout: Duration,
    /// Number of workers draining the queue
    pub concurrency: usize,
    /// Probe to run against reachable candidates
    pub probe_mode: ProbeMode,
    /// URL requested through the proxy when probing
    pub probe_url: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            probe_mode: ProbeMode::Disabled,
            probe_url: DEFAULT_PROBE_URL.to_string(),
        }
    }
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_probe_mode(mut self, mode: ProbeMode) -> Self {
        self.probe_mode = mode;
        self
    }

    pub fn with_probe_url(mut self, url: String) -> Self {
        self.probe_url = url;
        self
    }
}

/// Validates candidates with a fixed pool of workers
pub struct ProxyChecker<N: Network = LiveNetwork> {
    config: CheckerConfig,
    probe: ProxyProbe,
    network: Arc<N>,
}

impl ProxyChecker<LiveNetwork> {
    /// Create a new proxy checker with default configuration
    pub fn new() -> Self {
        Self::with_config(CheckerConfig::default())
    }

    /// Create a new proxy checker with custom configuration
    pub fn with_config(config: CheckerConfig) -> Self {
        Self::with_network(config, LiveNetwork::new())
    }
}

impl<N: Network> ProxyChecker<N> {
    /// Create a checker that performs its I/O through `network`
    pub fn with_network(config: CheckerConfig, network: N) -> Self {
        let probe = ProxyProbe::new(config.probe_url.clone(), config.timeout);
        Self {
            config,
            probe,
            network: Arc::new(network),
        }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check a single candidate: connect, then probe if it is up and probing is on
    pub async fn check_candidate(&self, candidate: Candidate) -> ValidationResult {
        let reachability = check_reachable(
            self.network.as_ref(),
            &candidate.host,
            candidate.port,
            self.config.timeout,
        )
        .await;

        let probe = if reachability.reachable {
            self.probe
                .run(self.network.as_ref(), &candidate, self.config.probe_mode)
                .await
        } else {
            None
        };

        let result = ValidationResult::new(candidate, reachability);
        match probe {
            Some(outcome) => result.with_probe(outcome),
            None => result,
        }
    }

    /// Validate every candidate exactly once and return all results.
    ///
    /// Workers share one queue and one result store; the results are only
    /// read after every worker has been joined.
    pub async fn run(
        &self,
        candidates: impl IntoIterator<Item = Candidate>,
    ) -> HashMap<Candidate, ValidationResult> {
        let queue = Arc::new(WorkQueue::new(candidates));
        let store = Arc::new(ResultStore::new());
        let total = queue.remaining();
        let workers = self.config.concurrency.min(total).max(1);

        info!(
            candidates = total,
            workers,
            timeout_secs = self.config.timeout.as_secs_f64(),
            probe = ?self.config.probe_mode,
            "starting validation"
        );

        let handles: Vec<_> = (0..workers)
            .map(|id| {
                let checker = self.clone();
                let queue = Arc::clone(&queue);
                let store = Arc::clone(&store);
                tokio::spawn(async move { checker.work(id, &queue, &store).await })
            })
            .collect();

        for outcome in join_all(handles).await {
            if let Err(e) = outcome {
                error!(error = %e, "worker task failed");
            }
        }

        let results = store.snapshot();
        info!(
            validated = results.len(),
            reachable = results.values().filter(|r| r.reachable).count(),
            "validation finished"
        );
        results
    }

    /// Worker loop: claim, validate, store, until the queue is drained
    async fn work(&self, id: usize, queue: &WorkQueue, store: &ResultStore) -> usize {
        let mut processed = 0;
        while let Some(candidate) = queue.claim() {
            let result = self.check_candidate(candidate).await;
            debug!(
                worker = id,
                proxy = %result.candidate,
                reachable = result.reachable,
                latency_ms = result.latency_ms,
                probed_ok = result.probed_ok,
                "validated"
            );
            store.put(result);
            processed += 1;
        }
        debug!(worker = id, processed, "worker done");
        processed
    }
}

impl<N: Network> Clone for ProxyChecker<N> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            probe: self.probe.clone(),
            network: Arc::clone(&self.network),
        }
    }
}

impl Default for ProxyChecker<LiveNetwork> {
    fn default() -> Self {
        Self::new()
    }
}
