//! report-console - generate site and supplier reports from a JSON request

mod access;
mod cli;
mod pipeline;

use anyhow::{bail, Result};
use chrono::Utc;
use clap::Parser;
use cli::CliArgs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();
    if let Err(message) = args.validate() {
        bail!(message);
    }

    tracing::info!("Starting report console");
    let outcome = pipeline::run(&args, Utc::now()).await?;

    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }
    for path in &outcome.written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
