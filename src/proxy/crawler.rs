//! Proxy crawler module for fetching candidate lists from configured sources
//!
//! Each source is a URL serving a proxy list for one protocol. Sources are
//! fetched one after another; a failing source is skipped and the rest of
//! the run carries on with whatever the other sources produced.

use crate::proxy::models::{Candidate, ProxyType};
use crate::proxy::parser::ProxyParser;
use crate::Result;
use reqwest::Client;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default user agent for HTTP requests
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Fatal discovery outcomes
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("no list sources configured for protocols: {0}")]
    NoSourcesConfigured(String),
    #[error("all {0} list sources failed")]
    NoSources(usize),
}

/// Result of crawling a single source
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// The source that was crawled
    pub source: String,
    /// Protocol the source was listed under
    pub proxy_type: ProxyType,
    /// Candidates extracted from the source
    pub candidates: BTreeSet<Candidate>,
    /// Error message if crawling failed
    pub error: Option<String>,
}

impl CrawlResult {
    pub fn success(source: String, proxy_type: ProxyType, candidates: BTreeSet<Candidate>) -> Self {
        Self {
            source,
            proxy_type,
            candidates,
            error: None,
        }
    }

    pub fn failure(source: String, proxy_type: ProxyType, error: String) -> Self {
        Self {
            source,
            proxy_type,
            candidates: BTreeSet::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Configuration for proxy crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Timeout for HTTP requests
    pub timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Proxy crawler for fetching candidate lists
pub struct ProxyCrawler {
    client: Client,
}

impl ProxyCrawler {
    /// Create a new proxy crawler with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(CrawlerConfig::default())
    }

    /// Create a new proxy crawler with custom configuration
    pub fn with_config(config: CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch and parse candidates from a single URL
    pub async fn crawl_url(&self, url: &str, proxy_type: ProxyType) -> Result<BTreeSet<Candidate>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        debug!(url, status = %response.status(), "fetched list source");
        let content = response.text().await?;
        Ok(ProxyParser::parse_string(&content, proxy_type))
    }

    /// Crawl every source listed for the selected protocols, one result per source
    pub async fn crawl_sources_with_results(
        &self,
        sources: &HashMap<ProxyType, Vec<String>>,
        protocols: &[ProxyType],
    ) -> Vec<CrawlResult> {
        let mut results = Vec::new();

        for proxy_type in protocols {
            let Some(urls) = sources.get(proxy_type) else {
                warn!(protocol = %proxy_type, "no list sources configured");
                continue;
            };
            debug!(protocol = %proxy_type, sources = urls.len(), "crawling protocol");

            for url in urls {
                let result = match self.crawl_url(url, *proxy_type).await {
                    Ok(candidates) => {
                        info!(url = %url, found = candidates.len(), "crawled list source");
                        CrawlResult::success(url.clone(), *proxy_type, candidates)
                    }
                    Err(e) => {
                        warn!(url = %url, error = %e, "skipping list source");
                        CrawlResult::failure(url.clone(), *proxy_type, e.to_string())
                    }
                };
                results.push(result);
            }
        }

        results
    }

    /// Build the deduplicated candidate set for the selected protocols.
    ///
    /// Fails only when nothing could be crawled at all.
    pub async fn discover(
        &self,
        sources: &HashMap<ProxyType, Vec<String>>,
        protocols: &[ProxyType],
    ) -> std::result::Result<BTreeSet<Candidate>, DiscoveryError> {
        let results = self.crawl_sources_with_results(sources, protocols).await;
        merge_results(results, protocols)
    }
}

fn merge_results(
    results: Vec<CrawlResult>,
    protocols: &[ProxyType],
) -> std::result::Result<BTreeSet<Candidate>, DiscoveryError> {
    if results.is_empty() {
        let names: Vec<String> = protocols.iter().map(ToString::to_string).collect();
        return Err(DiscoveryError::NoSourcesConfigured(names.join(", ")));
    }
    if !results.iter().any(CrawlResult::is_success) {
        return Err(DiscoveryError::NoSources(results.len()));
    }

    Ok(results
        .into_iter()
        .flat_map(|result| result.candidates)
        .collect())
}
