//! confab-trackerd — central directory for peer discovery and channels.

use anyhow::{Context, Result};

use confab_core::config::ConfabConfig;
use confab_services::Registry;
use confab_tracker::TrackerState;

fn print_usage() {
    println!("Usage: confab-trackerd [--host <addr>] [--port <port>]");
    println!();
    println!("Options:");
    println!("  --host <addr>   Bind address (default: from config, 127.0.0.1)");
    println!("  --port <port>   Listen port (default: from config, 8000)");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ConfabConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        ConfabConfig::default()
    });

    let mut host = config.tracker.host.clone();
    let mut port = config.tracker.port;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                i += 1;
                host = args.get(i).context("--host requires a value")?.clone();
            }
            "--port" => {
                i += 1;
                port = args
                    .get(i)
                    .context("--port requires a value")?
                    .parse()
                    .context("--port must be a number")?;
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    tracing::info!(host = %host, port, "confab tracker starting");

    let state = TrackerState {
        registry: Registry::new(),
    };
    confab_tracker::serve(state, &host, port).await
}
