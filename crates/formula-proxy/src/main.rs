//! `formula-proxy` binary entrypoint.
//!
//! Loads configuration (optional YAML file plus environment variables) and
//! starts the Actix server.

use clap::Parser;
use formula_proxy::{serve, ProxyConfig};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "formula-proxy", version, about)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, env = "FORMULA_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config file and PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Respect `RUST_LOG` if set; otherwise default to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ProxyConfig::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    serve(config).await
}
