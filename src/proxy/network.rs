//! Network layer used by the checker
//!
//! The checker never talks to sockets directly. It goes through [`Network`],
//! which lets the worker pool run against a scripted network in tests.

use crate::proxy::models::Candidate;
use crate::Result;
use async_trait::async_trait;
use reqwest::{Client, Proxy as ReqwestProxy};
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;

/// Status and body of a request sent through a proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxiedResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait Network: Send + Sync + 'static {
    /// Open a TCP connection to `host:port` and close it again.
    ///
    /// Callers bound this with their own timeout; dropping the future must
    /// release any socket it opened.
    async fn connect(&self, host: &str, port: u16) -> io::Result<()>;

    /// GET `url` using `candidate` as the forward proxy
    async fn get_via(
        &self,
        candidate: &Candidate,
        url: &str,
        timeout: Duration,
    ) -> Result<ProxiedResponse>;
}

/// Real sockets and HTTP
#[derive(Debug, Clone, Default)]
pub struct LiveNetwork;

impl LiveNetwork {
    pub fn new() -> Self {
        Self
    }

    /// Create a reqwest client routed through the candidate
    fn create_client(candidate: &Candidate, timeout: Duration) -> Result<Client> {
        // Route both http:// and https:// targets through the candidate.
        let proxy = ReqwestProxy::all(candidate.url())?;

        let client = Client::builder()
            .proxy(proxy)
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(client)
    }
}

#[async_trait]
impl Network for LiveNetwork {
    async fn connect(&self, host: &str, port: u16) -> io::Result<()> {
        let stream = TcpStream::connect((host, port)).await?;
        drop(stream);
        Ok(())
    }

    async fn get_via(
        &self,
        candidate: &Candidate,
        url: &str,
        timeout: Duration,
    ) -> Result<ProxiedResponse> {
        let client = Self::create_client(candidate, timeout)?;
        let response = client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ProxiedResponse { status, body })
    }
}
