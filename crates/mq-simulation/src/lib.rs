//! MQ-Simulation: synthetic mission telemetry
//!
//! Deterministic generators used by tests and benchmarks.

pub mod patterns;
pub mod simulator;

pub use patterns::QuakePattern;
pub use simulator::{SimulatorConfig, TelemetrySimulator};
