mod bootstrap_helpers;
mod cli_args;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncReadExt;
use wordenc_dialogue::{load_dialogue_fixture, replay_dialogue_fixture, TurnRequest};

use crate::bootstrap_helpers::{build_runtime, init_tracing};
use crate::cli_args::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run_cli(cli).await
}

async fn run_cli(cli: Cli) -> Result<()> {
    let runtime = build_runtime(&cli)?;

    if let Some(source) = cli.turn_request.as_deref() {
        let raw = read_request_source(source).await?;
        let request = serde_json::from_str::<TurnRequest>(&raw)
            .with_context(|| format!("failed to parse turn request from {source}"))?;
        let response = runtime.run_turn(request).await?;
        println!(
            "{}",
            serde_json::to_string_pretty(&response).context("failed to encode turn response")?
        );
        return Ok(());
    }

    if let Some(path) = cli.replay_fixture.as_deref() {
        let fixture = load_dialogue_fixture(path)?;
        let summary = replay_dialogue_fixture(&runtime, &fixture).await?;
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to encode replay summary")?
        );
    }
    Ok(())
}

async fn read_request_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("failed to read turn request from stdin")?;
        return Ok(raw);
    }
    tokio::fs::read_to_string(Path::new(source))
        .await
        .with_context(|| format!("failed to read turn request {source}"))
}
