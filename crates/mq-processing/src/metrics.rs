//! Per-stage timing for pipeline runs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Coefficient derivation
    Design,
    /// Zero-phase filtering
    Filter,
    /// Peak detection on the raw channel
    RawPeaks,
    /// Peak detection on the filtered channel
    FilteredPeaks,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Design => "design",
            Stage::Filter => "filter",
            Stage::RawPeaks => "raw_peaks",
            Stage::FilteredPeaks => "filtered_peaks",
        };
        f.write_str(name)
    }
}

/// Elapsed time of one completed stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageMetrics {
    pub stage: Stage,
    pub elapsed_us: u64,
}

/// Helper for timing a stage
pub struct StageTimer {
    stage: Stage,
    start_time: Instant,
}

impl StageTimer {
    pub fn start(stage: Stage) -> Self {
        Self {
            stage,
            start_time: Instant::now(),
        }
    }

    /// Finish timing and emit a debug event
    pub fn finish(self) -> StageMetrics {
        let elapsed_us = self.start_time.elapsed().as_micros() as u64;
        tracing::debug!(stage = %self.stage, elapsed_us, "stage complete");
        StageMetrics {
            stage: self.stage,
            elapsed_us,
        }
    }
}

/// Sum of elapsed time across stages
pub fn total_elapsed_us(metrics: &[StageMetrics]) -> u64 {
    metrics.iter().map(|m| m.elapsed_us).sum()
}
