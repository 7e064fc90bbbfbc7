//! Serializable bundle of every per-mission output

use crate::config::PipelineConfig;
use crate::filters::FilterCoefficients;
use crate::metrics::StageMetrics;
use crate::peaks::PeakSet;
use crate::pipeline::{FilteredSeries, PipelineResult, SignalPipeline};
use crate::summary::PeakRecord;
use mq_core::{EventBreakdown, Histogram, MqResult, Series, SeriesStats};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Analysis of one mission dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionReport {
    pub mission: String,
    pub run_id: Uuid,
    pub config: PipelineConfig,
    pub samples: usize,
    pub stats: SeriesStats,
    pub events: EventBreakdown,
    pub histogram: Histogram,
    pub raw_peaks: PeakSet,
    pub filtered_peaks: PeakSet,
    pub summary: Vec<PeakRecord>,
    pub raw_summary: Vec<PeakRecord>,
    pub coefficients: FilterCoefficients,
    pub metrics: Vec<StageMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered: Option<FilteredSeries>,
}

impl MissionReport {
    /// Run `pipeline` over `series` and assemble the report
    pub fn analyze(
        mission: impl Into<String>,
        pipeline: &SignalPipeline,
        series: &Series,
        include_filtered: bool,
    ) -> MqResult<Self> {
        let result = pipeline.run(series)?;
        Self::build(mission, pipeline.config(), series, result, include_filtered)
    }

    /// Assemble a report from a completed run
    pub fn build(
        mission: impl Into<String>,
        config: &PipelineConfig,
        series: &Series,
        result: PipelineResult,
        include_filtered: bool,
    ) -> MqResult<Self> {
        let summary = result.summary(series, config.summary_limit)?;
        let raw_summary = result.raw_summary(series, config.summary_limit)?;
        let histogram = Histogram::from_values(&series.values(), config.histogram_bins)?;

        Ok(Self {
            mission: mission.into(),
            run_id: result.run_id,
            config: config.clone(),
            samples: series.len(),
            stats: series.stats(),
            events: EventBreakdown::from_series(series),
            histogram,
            raw_peaks: result.raw_peaks,
            filtered_peaks: result.filtered_peaks,
            summary,
            raw_summary,
            coefficients: result.coefficients,
            metrics: result.metrics,
            filtered: include_filtered.then_some(result.filtered),
        })
    }
}
