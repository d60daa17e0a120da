//! Caching forward HTTP proxy.
//!
//! Startup order: CLI → tracing → config (file or defaults) → listener bind
//! → console + signal tasks → accept loop. Shutdown is abrupt: the first
//! SIGINT/SIGTERM stops the accept loop and the process exits, abandoning
//! in-flight connections.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forward_proxy::config::loader::load_config;
use forward_proxy::net::listener::Listener;
use forward_proxy::{console, lifecycle, ProxyConfig, ProxyServer, Shutdown};

#[derive(Parser)]
#[command(name = "forward-proxy")]
#[command(about = "Caching forward HTTP proxy with a hostname allowlist", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 127.0.0.1:8080).
    #[arg(short, long)]
    bind: Option<String>,

    /// Disable the stdin operator console.
    #[arg(long)]
    no_console: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forward_proxy=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if cli.no_console {
        config.console.enabled = false;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        cache_capacity = config.cache.capacity,
        allowlisted_hosts = config.allowlist.hosts.len(),
        origin_port = config.origin.port,
        "configuration loaded"
    );

    let shutdown = Shutdown::new();
    let listener = Listener::bind(&config.listener).await?;
    let server = ProxyServer::new(&config);

    if config.console.enabled {
        tokio::spawn(console::run(server.cache(), shutdown.subscribe()));
    }

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        lifecycle::signals::wait_for_termination().await;
        signal_shutdown.trigger();
    });

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
