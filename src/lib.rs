//! Open Proxy Checker
//!
//! Discovers candidate proxies from public list sources and validates them
//! with a pool of concurrent workers: TCP reachability first, then an
//! optional request through the proxy that reveals its egress IP.

pub mod config;
pub mod proxy;
pub mod report;

pub use config::Config;
pub use proxy::*;

/// Application result type
pub type Result<T> = anyhow::Result<T>;
