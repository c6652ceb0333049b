//! CLI entry-point for running the connection-test suite.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, probes};

/// Args for the `check` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Emit the full result as JSON.
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let result = probes::run_all(&settings).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for service in &result.services {
        let elapsed = service
            .response_time_ms
            .map(|ms| format!(" ({ms} ms)"))
            .unwrap_or_default();
        println!(
            "[{}] {}{}: {}",
            service.status.as_str(),
            service.name,
            elapsed,
            service.message
        );
    }
    println!("overall: {}", result.overall.as_str());
    Ok(())
}
