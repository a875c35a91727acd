//! nodecapd: the nodecap daemon.
//!
//! Computes capacity, allocatable, and free resources of every cluster node,
//! either once on the command line or per request over HTTP.
//!
//! # Usage
//!
//! ```text
//! nodecapd report ~/.kube/config --context staging
//! nodecapd report --snapshot cluster.json --requests
//! nodecapd serve --port 8080 --config /etc/nodecap/nodecap.toml
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use nodecap_accounting::{Accountant, GpuResolver};
use nodecap_api::node_views;
use nodecap_core::NodecapConfig;

#[derive(Parser)]
#[command(name = "nodecapd", about = "Kubernetes node resource accounting")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one accounting cycle and print the result as JSON.
    Report {
        /// Kubeconfig file to connect with.
        kubeconfig: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        /// Print per-node request and limit totals instead of free capacity.
        #[arg(long)]
        requests: bool,

        /// Print compact JSON instead of indented JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Serve the HTTP API.
    Serve {
        /// Kubeconfig file to connect with.
        #[arg(long)]
        kubeconfig: Option<PathBuf>,

        #[command(flatten)]
        source: SourceArgs,

        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind.
        #[arg(long)]
        bind: Option<String>,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Kubeconfig context to use.
    #[arg(long)]
    context: Option<String>,

    /// Read cluster state from a JSON snapshot instead of a live cluster.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Path to nodecap.toml.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SourceArgs {
    /// Load the config file and apply command-line overrides.
    fn resolve(&self, kubeconfig: Option<PathBuf>) -> anyhow::Result<NodecapConfig> {
        let mut config = NodecapConfig::load(self.config.as_deref())
            .with_context(|| format!("failed to load config {:?}", self.config))?;

        if kubeconfig.is_some() {
            config.cluster.kubeconfig = kubeconfig;
        }
        if self.context.is_some() {
            config.cluster.context = self.context.clone();
        }
        if self.snapshot.is_some() {
            config.cluster.snapshot = self.snapshot.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries report JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "info,nodecapd=debug,nodecap_accounting=debug,nodecap_provider=debug"
                        .parse()
                        .unwrap()
                }),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Report {
            kubeconfig,
            source,
            requests,
            compact,
        } => {
            let config = source.resolve(kubeconfig)?;
            run_report(&config, requests, compact).await
        }
        Command::Serve {
            kubeconfig,
            source,
            port,
            bind,
        } => {
            let mut config = source.resolve(kubeconfig)?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            run_serve(&config).await
        }
    }
}

async fn build_accountant(config: &NodecapConfig) -> anyhow::Result<Accountant> {
    let provider = nodecap_provider::connect(&config.cluster).await?;
    let gpu = GpuResolver::from_config(&config.accounting);
    info!(vendors = ?gpu.vendor_prefixes(), "cluster state provider ready");
    Ok(Accountant::new(provider, gpu))
}

async fn run_report(config: &NodecapConfig, requests: bool, compact: bool) -> anyhow::Result<()> {
    let accountant = build_accountant(config).await?;

    if requests {
        let totals = accountant.request_totals().await?;
        println!("{}", render(&totals, compact)?);
        return Ok(());
    }

    for view in node_views(accountant.report().await?) {
        println!("{}", render(&view, compact)?);
    }
    Ok(())
}

fn render<T: Serialize>(value: &T, compact: bool) -> serde_json::Result<String> {
    if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
}

async fn run_serve(config: &NodecapConfig) -> anyhow::Result<()> {
    info!("nodecap daemon starting");

    let accountant = build_accountant(config).await?;
    let router = nodecap_api::build_router(accountant);

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind))?;

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
            }
        })
        .await?;

    info!("nodecap daemon stopped");
    Ok(())
}
