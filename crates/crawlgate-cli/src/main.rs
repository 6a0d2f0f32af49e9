use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crawlgate_cli::Gate;
use crawlgate_cli::display::write_report;
use crawlgate_core::{AgentIdentity, DEFAULT_AGENT};
use crawlgate_fetch::FetchConfig;
use crawlgate_store::{DEFAULT_LOG_PATH, JsonlFileSink};

const DEFAULT_URL: &str = "http://127.0.0.1:5000/blog/article1";

/// Check whether a site's robots.txt permits AI-training use of a page, and
/// append an audit record of the decision.
#[derive(Parser, Debug)]
#[command(name = "crawlgate", version, about)]
struct Cli {
    /// Page URLs to check.
    #[arg(default_value = DEFAULT_URL)]
    urls: Vec<String>,

    /// Crawler product token, sent as User-Agent and matched against policies.
    #[arg(long, env = "CRAWLGATE_AGENT", default_value = DEFAULT_AGENT)]
    agent: AgentIdentity,

    /// Policy fetch timeout in seconds.
    #[arg(
        long,
        env = "CRAWLGATE_TIMEOUT_SECS",
        default_value_t = FetchConfig::DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Maximum robots.txt size in bytes; larger bodies keep only whole lines.
    #[arg(long, default_value_t = FetchConfig::DEFAULT_MAX_BODY_BYTES)]
    max_body_bytes: usize,

    /// Provenance log (newline-delimited JSON, appended to).
    #[arg(long, env = "CRAWLGATE_LOG", default_value = DEFAULT_LOG_PATH)]
    log: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    tracing::info!(agent = %cli.agent, "crawlgate v{}", env!("CARGO_PKG_VERSION"));

    let config = FetchConfig {
        timeout: Duration::from_secs(cli.timeout_secs),
        max_body_bytes: cli.max_body_bytes,
    };
    let sink = Arc::new(JsonlFileSink::new(&cli.log));
    let gate = Gate::http(cli.agent, config, sink).context("building policy fetcher")?;

    let results = gate.check_many(cli.urls.as_slice()).await;
    let unrecorded = write_report(&mut std::io::stdout().lock(), &cli.urls, results)
        .context("writing results")?;

    anyhow::ensure!(
        unrecorded == 0,
        "{unrecorded} provenance record(s) could not be appended to {}",
        cli.log.display()
    );
    Ok(())
}
