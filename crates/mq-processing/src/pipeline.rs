//! Filter-then-detect pipeline over one telemetry series

use crate::config::PipelineConfig;
use crate::filters::{FilterCoefficients, FilterDesigner, FilterSpec, ZeroPhaseFilter};
use crate::metrics::{self, Stage, StageMetrics, StageTimer};
use crate::peaks::{PeakDetector, PeakSet};
use crate::summary::{summarize, PeakRecord};
use mq_core::{MqResult, Series};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Low-pass output aligned index-for-index with its source series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilteredSeries {
    values: Vec<f64>,
}

impl FilteredSeries {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

/// Everything produced by one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub coefficients: FilterCoefficients,
    pub filtered: FilteredSeries,
    pub raw_peaks: PeakSet,
    pub filtered_peaks: PeakSet,
    pub metrics: Vec<StageMetrics>,
}

impl PipelineResult {
    /// First `limit` filtered peaks joined to `series`
    pub fn summary(&self, series: &Series, limit: usize) -> MqResult<Vec<PeakRecord>> {
        summarize(series, self.filtered.values(), &self.filtered_peaks, limit)
    }

    /// First `limit` raw peaks joined to `series`
    pub fn raw_summary(&self, series: &Series, limit: usize) -> MqResult<Vec<PeakRecord>> {
        summarize(series, self.filtered.values(), &self.raw_peaks, limit)
    }

    pub fn total_elapsed_us(&self) -> u64 {
        metrics::total_elapsed_us(&self.metrics)
    }
}

/// Designs the filter, smooths the series and detects peaks on both channels
///
/// Each run is independent; a pipeline holds only its configuration and can
/// be shared between threads.
#[derive(Debug, Clone)]
pub struct SignalPipeline {
    config: PipelineConfig,
}

impl SignalPipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: PipelineConfig) -> MqResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Pipeline with the reference configuration
    pub fn reference() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run with the configured filter and threshold
    pub fn run(&self, series: &Series) -> MqResult<PipelineResult> {
        let spec = self.config.filter_spec()?;
        self.run_with(series, &spec, self.config.min_height)
    }

    /// Run with an explicit filter and threshold
    pub fn run_with(
        &self,
        series: &Series,
        spec: &FilterSpec,
        min_height: f64,
    ) -> MqResult<PipelineResult> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline_run", %run_id, samples = series.len());
        let _enter = span.enter();

        let mut stage_metrics = Vec::with_capacity(4);

        let timer = StageTimer::start(Stage::Design);
        let coefficients = FilterDesigner::design(spec)?;
        stage_metrics.push(timer.finish());

        let timer = StageTimer::start(Stage::Filter);
        let raw = series.values();
        let filter = ZeroPhaseFilter::new(coefficients);
        let filtered = FilteredSeries {
            values: filter.apply(&raw)?,
        };
        stage_metrics.push(timer.finish());

        let detector = PeakDetector::new(min_height);
        let detect_raw = || {
            span.in_scope(|| {
                let timer = StageTimer::start(Stage::RawPeaks);
                (detector.detect(&raw), timer.finish())
            })
        };
        let detect_filtered = || {
            span.in_scope(|| {
                let timer = StageTimer::start(Stage::FilteredPeaks);
                (detector.detect(filtered.values()), timer.finish())
            })
        };

        let ((raw_peaks, raw_metrics), (filtered_peaks, filtered_metrics)) =
            if self.config.parallel_detection {
                rayon::join(detect_raw, detect_filtered)
            } else {
                (detect_raw(), detect_filtered())
            };
        stage_metrics.push(raw_metrics);
        stage_metrics.push(filtered_metrics);

        tracing::info!(
            raw_peaks = raw_peaks.len(),
            filtered_peaks = filtered_peaks.len(),
            elapsed_us = metrics::total_elapsed_us(&stage_metrics),
            "pipeline run complete"
        );

        Ok(PipelineResult {
            run_id,
            coefficients: filter.coefficients().clone(),
            filtered,
            raw_peaks,
            filtered_peaks,
            metrics: stage_metrics,
        })
    }
}

impl Default for SignalPipeline {
    fn default() -> Self {
        Self::reference()
    }
}
