//! MQ-CLI: command line surface for mission telemetry analysis
//!
//! Loads `{mission}_data.csv` datasets, runs the processing pipeline for
//! each mission concurrently and emits JSON reports.

pub mod cli;
pub mod commands;
pub mod loader;
pub mod runner;

pub use cli::{AnalyzeArgs, Cli, Command, SimulateArgs};
pub use loader::{read_series, write_series, LoadError, MissionLoader, DEFAULT_MISSION};
pub use runner::{MissionError, MissionOutcome, MissionRunner};
