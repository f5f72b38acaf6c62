use anyhow::Result;
use clap::{Parser, ValueEnum};
use open_proxy_checker::{
    config::{Config, DEFAULT_CONFIG_PATH},
    proxy::{ProbeMode, ProxyChecker, ProxyCrawler, ProxyType},
    report::{self, EgressSummary},
};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, Level};

/// Discovers open proxies from list sources and checks which ones are up
#[derive(Parser)]
#[command(name = "open-proxy-checker")]
#[command(about = "Open proxy checker")]
struct Cli {
    /// Provide verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file with list sources per protocol
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Number of concurrent workers
    #[arg(short = 'T', long, default_value = "32")]
    threads: usize,

    /// Timeout in seconds for every fetch, connect and probe
    #[arg(short = 't', long, default_value = "10")]
    timeout: u64,

    /// Proxy type
    #[arg(short = 'p', long, value_enum)]
    proxy_type: ProtocolArg,

    /// Check external (outgoing) proxy IP. Slow.
    #[arg(short = 'e', long)]
    external: bool,

    /// Check if the probe URL works via the proxy. Slow.
    #[arg(short = 'r', long)]
    reachability: bool,

    /// URL requested through each proxy when probing
    #[arg(short = 'u', long)]
    probe_url: Option<String>,

    /// Display only active proxies
    #[arg(short = 'a', long)]
    active: bool,

    /// Write the JSON report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProtocolArg {
    Http,
    Https,
    Socks4,
    Socks5,
    All,
}

impl ProtocolArg {
    fn protocols(self) -> Vec<ProxyType> {
        match self {
            ProtocolArg::Http => vec![ProxyType::Http],
            ProtocolArg::Https => vec![ProxyType::Https],
            ProtocolArg::Socks4 => vec![ProxyType::Socks4],
            ProtocolArg::Socks5 => vec![ProxyType::Socks5],
            ProtocolArg::All => ProxyType::ALL.to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(io::stderr)
        .init();

    debug!(config = %cli.config.display(), "loading list sources");
    let mut config = Config::from_file(&cli.config)?
        .with_worker_count(cli.threads)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_probe_mode(ProbeMode::from_flags(cli.reachability, cli.external))
        .with_only_reachable(cli.active);
    if let Some(url) = cli.probe_url {
        config = config.with_probe_url(url);
    }

    let crawler = ProxyCrawler::with_config(config.crawler_config())?;
    let candidates = crawler
        .discover(&config.sources, &cli.proxy_type.protocols())
        .await?;
    info!(candidates = candidates.len(), "discovery finished");

    let checker = ProxyChecker::with_config(config.checker_config());
    let results = checker.run(candidates).await;

    if config.probe_mode == ProbeMode::Egress {
        let summary = EgressSummary::from_results(results.values());
        info!(
            same = summary.same,
            empty = summary.empty,
            different = summary.different,
            "egress IPs"
        );
    }

    let written = match &cli.output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            let written = report::write_json(&results, config.only_reachable, file)?;
            info!(path = %path.display(), records = written, "report saved");
            written
        }
        None => report::write_json(&results, config.only_reachable, io::stdout().lock())?,
    };
    debug!("Displayed {} results", written);

    Ok(())
}
