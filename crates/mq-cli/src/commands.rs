//! Subcommand implementations

use crate::cli::{AnalyzeArgs, SimulateArgs};
use crate::loader::{write_series, MissionLoader};
use crate::runner::{MissionOutcome, MissionRunner};
use anyhow::{Context, Result};
use mq_processing::SignalPipeline;
use mq_simulation::{SimulatorConfig, TelemetrySimulator};
use std::io::Write;

/// Analyse the requested missions and write the JSON report array to `out`
pub async fn analyze(args: &AnalyzeArgs, out: &mut impl Write) -> Result<Vec<MissionOutcome>> {
    let config = args.pipeline_config()?;
    tracing::info!(
        missions = args.missions.len(),
        data_dir = %args.data_dir.display(),
        cutoff_fraction = config.filter.cutoff_fraction,
        min_height = config.min_height,
        "starting analysis"
    );

    let pipeline = SignalPipeline::new(config)?;
    let runner = MissionRunner::new(MissionLoader::new(&args.data_dir), pipeline)
        .with_filtered(args.include_filtered);
    let outcomes = runner.run_all(&args.missions).await;

    serde_json::to_writer_pretty(&mut *out, &outcomes).context("writing report")?;
    writeln!(out)?;
    Ok(outcomes)
}

/// Generate a synthetic dataset and write it to `args.output`
pub fn simulate(args: &SimulateArgs) -> Result<()> {
    let mut config = SimulatorConfig::default().with_samples(args.samples);
    config.seed = args.seed;

    let simulator = TelemetrySimulator::new(config)?;
    let series = simulator.generate();
    write_series(&args.output, &series)
        .with_context(|| format!("writing {}", args.output.display()))?;

    tracing::info!(
        samples = series.len(),
        seed = simulator.seed(),
        output = %args.output.display(),
        "synthetic mission written"
    );
    Ok(())
}
