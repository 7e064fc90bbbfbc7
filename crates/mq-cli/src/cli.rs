//! Command line arguments

use crate::loader::DEFAULT_MISSION;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mq_processing::PipelineConfig;
use std::path::PathBuf;

/// [clap] derived struct to parse command line arguments.
#[derive(Debug, Parser)]
#[command(author, version, about = "Moonquake telemetry filtering and peak detection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyse mission datasets and print a JSON report array
    Analyze(AnalyzeArgs),
    /// Write a synthetic mission dataset
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Missions to analyse; each reads `{mission}_data.csv`
    #[arg(default_value = DEFAULT_MISSION)]
    pub missions: Vec<String>,

    /// Directory holding the mission CSV files
    #[arg(long, env = "MQ_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// JSON pipeline configuration used as the base for the flags below
    #[arg(long, env = "MQ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Low-pass cutoff as a fraction of Nyquist
    #[arg(long, env = "MQ_CUTOFF_FRACTION")]
    pub cutoff_fraction: Option<f64>,

    /// Sampling rate of the series
    #[arg(long, env = "MQ_SAMPLING_RATE")]
    pub sampling_rate: Option<f64>,

    /// Inclusive peak height threshold
    #[arg(long, env = "MQ_MIN_HEIGHT")]
    pub min_height: Option<f64>,

    /// Number of peaks kept in each summary
    #[arg(long, env = "MQ_SUMMARY_LIMIT")]
    pub summary_limit: Option<usize>,

    /// Histogram bin count
    #[arg(long, env = "MQ_HISTOGRAM_BINS")]
    pub histogram_bins: Option<usize>,

    /// Detect raw and filtered peaks one after the other
    #[arg(long)]
    pub sequential: bool,

    /// Include the full filtered series in each report
    #[arg(long)]
    pub include_filtered: bool,
}

impl AnalyzeArgs {
    /// Base configuration overridden by any flags given
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(cutoff_fraction) = self.cutoff_fraction {
            config.filter.cutoff_fraction = cutoff_fraction;
        }
        if let Some(sampling_rate) = self.sampling_rate {
            config.filter.sampling_rate = sampling_rate;
        }
        if let Some(min_height) = self.min_height {
            config.min_height = min_height;
        }
        if let Some(summary_limit) = self.summary_limit {
            config.summary_limit = summary_limit;
        }
        if let Some(histogram_bins) = self.histogram_bins {
            config.histogram_bins = histogram_bins;
        }
        if self.sequential {
            config.parallel_detection = false;
        }

        config.validate().context("invalid pipeline configuration")?;
        Ok(config)
    }
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Number of samples
    #[arg(long, default_value_t = 2000)]
    pub samples: usize,

    /// Random seed; a random one is chosen when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Destination CSV file
    #[arg(long)]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_args(argv: &[&str]) -> AnalyzeArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Analyze(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_default_mission() {
        let args = analyze_args(&["mq", "analyze"]);
        assert_eq!(args.missions, vec!["apollo".to_string()]);
        assert_eq!(args.pipeline_config().unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = analyze_args(&[
            "mq",
            "analyze",
            "apollo",
            "luna",
            "--min-height",
            "120",
            "--cutoff-fraction",
            "0.25",
            "--sequential",
        ]);
        assert_eq!(args.missions, vec!["apollo", "luna"]);

        let config = args.pipeline_config().unwrap();
        assert_eq!(config.min_height, 120.0);
        assert_eq!(config.filter.cutoff_fraction, 0.25);
        assert!(!config.parallel_detection);
        assert_eq!(config.summary_limit, 5);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mq.json");
        std::fs::write(&path, r#"{"summary_limit": 9, "min_height": 10.0}"#).unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let args = analyze_args(&["mq", "analyze", "--config", &path_arg, "--min-height", "20"]);
        let config = args.pipeline_config().unwrap();
        assert_eq!(config.summary_limit, 9);
        assert_eq!(config.min_height, 20.0);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = analyze_args(&["mq", "analyze", "--cutoff-fraction", "1.5"]);
        assert!(args.pipeline_config().is_err());
    }

    #[test]
    fn test_simulate_args() {
        let cli = Cli::try_parse_from(["mq", "simulate", "--output", "out.csv", "--seed", "7"])
            .unwrap();
        match cli.command {
            Command::Simulate(args) => {
                assert_eq!(args.samples, 2000);
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.output, PathBuf::from("out.csv"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
