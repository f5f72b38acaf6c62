//! Proxy module for discovering and validating proxies
//!
//! This module provides functionality for:
//! - Crawling list sources and extracting `IP:PORT` candidates
//! - Checking TCP reachability of each candidate with a pool of workers
//! - Optionally probing reachable candidates with a request sent through them

pub mod checker;
pub mod crawler;
pub mod models;
pub mod network;
pub mod parser;
pub mod probe;
pub mod queue;
pub mod reachability;
pub mod store;

pub use checker::{CheckerConfig, ProxyChecker};
pub use crawler::{CrawlResult, CrawlerConfig, DiscoveryError, ProxyCrawler};
pub use models::{Candidate, ProbeOutcome, ProxyType, Reachability, ValidationResult};
pub use network::{LiveNetwork, Network, ProxiedResponse};
pub use parser::ProxyParser;
pub use probe::{ProbeMode, ProxyProbe};
pub use queue::WorkQueue;
pub use store::ResultStore;
