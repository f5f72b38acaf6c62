//! Run configuration and the YAML list-source file

use crate::proxy::checker::CheckerConfig;
use crate::proxy::crawler::CrawlerConfig;
use crate::proxy::models::ProxyType;
use crate::proxy::probe::{ProbeMode, DEFAULT_PROBE_URL};
use crate::Result;
use anyhow::Context;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default list-source file
pub const DEFAULT_CONFIG_PATH: &str = "openproxies.yaml";

/// Protocol to list-source URLs
pub type SourceMap = HashMap<ProxyType, Vec<String>>;

/// Everything a validation run needs
#[derive(Debug, Clone)]
pub struct Config {
    /// List sources per protocol
    pub sources: SourceMap,
    /// Number of workers
    pub worker_count: usize,
    /// Timeout for every fetch, connect and probe
    pub timeout: Duration,
    pub probe_mode: ProbeMode,
    pub probe_url: String,
    /// Report only reachable candidates
    pub only_reachable: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourceMap::new(),
            worker_count: 32,
            timeout: Duration::from_secs(10),
            probe_mode: ProbeMode::Disabled,
            probe_url: DEFAULT_PROBE_URL.to_string(),
            only_reachable: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings with sources read from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::default().with_sources(load_sources(path)?))
    }

    pub fn with_sources(mut self, sources: SourceMap) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_worker_count(mut self, workers: usize) -> Self {
        self.worker_count = workers.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(Duration::from_secs(1));
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

    pub fn with_only_reachable(mut self, only_reachable: bool) -> Self {
        self.only_reachable = only_reachable;
        self
    }

    pub fn checker_config(&self) -> CheckerConfig {
        CheckerConfig::new()
            .with_concurrency(self.worker_count)
            .with_timeout(self.timeout)
            .with_probe_mode(self.probe_mode)
            .with_probe_url(self.probe_url.clone())
    }

    pub fn crawler_config(&self) -> CrawlerConfig {
        CrawlerConfig::new().with_timeout(self.timeout)
    }
}

/// Parse a list-source document.
///
/// ```yaml
/// http:
///   - https://example.com/http.txt
/// socks5:
///   - https://example.com/socks5.txt
/// ```
///
/// A protocol key with no entries is treated as an empty list.
pub fn parse_sources(content: &str) -> Result<SourceMap> {
    let raw: Option<HashMap<ProxyType, Option<Vec<String>>>> = serde_yaml::from_str(content)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(ty, urls)| (ty, urls.unwrap_or_default()))
        .collect())
}

/// Read and parse a list-source file
pub fn load_sources<P: AsRef<Path>>(path: P) -> Result<SourceMap> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Couldn't read config file {}", path.display()))?;
    parse_sources(&content)
        .with_context(|| format!("Couldn't parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.worker_count, 32);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.probe_mode, ProbeMode::Disabled);
        assert!(!config.only_reachable);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_config_builder_clamps() {
        let config = Config::new()
            .with_worker_count(0)
            .with_timeout(Duration::ZERO);
        assert_eq!(config.worker_count, 1);
        assert_eq!(config.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_checker_config_from_config() {
        let config = Config::new()
            .with_worker_count(8)
            .with_timeout(Duration::from_secs(3))
            .with_probe_mode(ProbeMode::Egress);
        let checker = config.checker_config();
        assert_eq!(checker.concurrency, 8);
        assert_eq!(checker.timeout, Duration::from_secs(3));
        assert_eq!(checker.probe_mode, ProbeMode::Egress);
        assert_eq!(config.crawler_config().timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_parse_sources() {
        let yaml = r#"
http:
  - https://example.com/http.txt
  - https://example.com/more.txt
socks5:
  - https://example.com/socks5.txt
socks4:
"#;
        let sources = parse_sources(yaml).unwrap();
        assert_eq!(sources[&ProxyType::Http].len(), 2);
        assert_eq!(sources[&ProxyType::Socks5], vec!["https://example.com/socks5.txt"]);
        assert!(sources[&ProxyType::Socks4].is_empty());
        assert!(!sources.contains_key(&ProxyType::Https));
    }

    #[test]
    fn test_parse_sources_rejects_unknown_protocol() {
        assert!(parse_sources("ftp:\n  - https://example.com\n").is_err());
    }

    #[test]
    fn test_load_sources_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "https:\n  - https://example.com/https.txt").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.sources[&ProxyType::Https].len(), 1);
    }

    #[test]
    fn test_load_sources_missing_file() {
        let err = load_sources("/nonexistent/openproxies.yaml").unwrap_err();
        assert!(err.to_string().contains("Couldn't read config file"));
    }
}
