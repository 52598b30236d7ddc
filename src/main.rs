//! Gemini model rate checker.
//!
//! Polls the generativelanguage model catalog, probes each
//! generateContent-capable model with a minimal request, appends the
//! outcome to a rolling 50-run history, and renders a self-contained
//! HTML dashboard plus an optional JSON summary.
//!
//! Failures are logged, never raised: the process exits 0 on every
//! path so a scheduler can run it unattended.

use clap::Parser;
use std::path::PathBuf;
use tracing::error;

mod catalog;
mod classifier;
mod gemini;
mod history;
mod probe;
mod report;
mod runner;

/// Check Gemini model availability and rate-limit status.
#[derive(Debug, Parser)]
#[command(name = "ratecheck", version, about)]
struct Args {
    /// Optional file path for structured JSON output.
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Skip generating the HTML dashboard output.
    #[arg(long)]
    no_html: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` beside the invocation is optional; only the key matters.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ratecheck=info".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let mut config = runner::CheckConfig::from_env();
    config.json_out = args.json_out;
    config.write_html = !args.no_html;

    if let Err(e) = runner::run_check(&config).await {
        error!("❌ {}", e);
    }

    Ok(())
}
