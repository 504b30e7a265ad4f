//! Grain classification runner
//!
//! Reads one lot's detector output as JSON, grades it with the configured
//! thresholds and writes the outcome as JSON to stdout.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use grain_quality_engine::{Config, EngineError, GradingEngine};
use shared::LotClassificationRequest;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "grain-classify", about = "Grade a coffee lot from detector features")]
struct Args {
    /// Lot classification request (JSON)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Pretty-print the JSON outcome
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON lines
    #[arg(long, env = "CQM_LOG_JSON")]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing; stdout is reserved for the outcome
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grain_quality_engine=debug,grain_classify=info".into()),
        )
        .with(
            args.json_logs
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!args.json_logs)
                .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;
    tracing::info!("Environment: {}", config.environment);

    let engine = GradingEngine::new(config.thresholds)?;

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let request: LotClassificationRequest =
        serde_json::from_str(&raw).context("parsing lot classification request")?;

    match engine.classify_lot(&request) {
        Ok(outcome) => {
            let json = if args.pretty {
                serde_json::to_string_pretty(&outcome)?
            } else {
                serde_json::to_string(&outcome)?
            };
            println!("{}", json);
            Ok(())
        }
        Err(err @ EngineError::NoGrainsDetected { .. }) => {
            eprintln!("{}", serde_json::to_string(&err.detail())?);
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
