//! Footprint - OSINT investigation orchestrator
//!
//! Runs breach, paste, social, domain, DNS, WHOIS, IP and company collectors
//! against a target concurrently and prints one consolidated report.

use clap::Parser;
use footprint::{app, cli::Cli, config::Config};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment, and CLI args.
    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {:#}", err);
            return ExitCode::from(1);
        }
    };

    init_tracing(&config.log_level);

    match app::run(&cli, &config).await {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(1)
        }
    }
}

/// Logs go to stderr so stdout only ever carries the report. `RUST_LOG`
/// takes precedence over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
