//! swipe-audit-server - HTTP front end for the swipe audit engine.

use std::path::PathBuf;

use clap::Parser;
use swipe_audit::api::{create_router, AppState};
use swipe_audit::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Badge-swipe audit server
#[derive(Parser, Debug)]
#[command(name = "swipe-audit-server", version)]
struct Args {
    /// Path to the YAML rule file. The built-in rules apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Log filter, e.g. `info` or `swipe_audit=debug`
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let loader = match &args.config {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::from_defaults(),
    };
    info!(
        config = ?args.config,
        burst_window_seconds = loader.config().thresholds.burst_window_seconds,
        "Loaded audit rules"
    );

    let router = create_router(AppState::new(loader));
    let listener = tokio::net::TcpListener::bind(&args.bind).await?;
    info!(bind = %args.bind, "Listening");

    axum::serve(listener, router).await?;
    Ok(())
}
