use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use consultation_summary::config::{self, EngineConfig};
use consultation_summary::models::ConsultationRecord;
use consultation_summary::SummaryEngine;

/// Summarize a clinical consultation record into sections with advisory warnings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Record JSON (stdin when omitted)
    record: Option<PathBuf>,
}

fn read_input(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read record from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    consultation_summary::init_tracing();

    let engine_config = EngineConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        version = config::APP_VERSION,
        default_strategy = engine_config.default_strategy.as_str(),
        llm_provider = engine_config.llm_provider().map(|p| p.as_str()),
        "{} starting",
        config::APP_NAME
    );

    let raw = read_input(args.record)?;
    let record: ConsultationRecord =
        serde_json::from_str(&raw).context("input is not a valid consultation record")?;

    let envelope = SummaryEngine::new(engine_config).process(&record);
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
