//! `mq`: moonquake telemetry analysis

use clap::Parser;
use mq_cli::{commands, Cli, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // stdout carries the JSON report
    let log_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Analyze(analyze) => {
            let mut stdout = std::io::stdout().lock();
            let outcomes = commands::analyze(&analyze, &mut stdout).await?;
            let failed = outcomes.iter().filter(|o| !o.is_report()).count();
            if failed > 0 {
                tracing::warn!(failed, total = outcomes.len(), "some missions produced no report");
            }
        }
        Command::Simulate(simulate) => commands::simulate(&simulate)?,
    }

    Ok(())
}
