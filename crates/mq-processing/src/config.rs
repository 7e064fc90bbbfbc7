//! Pipeline configuration

use crate::filters::FilterSpec;
use mq_core::{MqError, MqResult, DEFAULT_BINS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Low-pass filter parameters as supplied by callers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Cutoff as a fraction of the Nyquist frequency, in `(0, 1)`
    pub cutoff_fraction: f64,
    /// Samples per unit time, positive
    pub sampling_rate: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            cutoff_fraction: 0.1,
            sampling_rate: 1.0,
        }
    }
}

/// Everything a pipeline run needs besides the series itself
///
/// `Default` is the reference configuration. Fields missing from a JSON
/// document take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub filter: FilterSettings,
    /// Inclusive peak threshold, applied to both channels
    pub min_height: f64,
    /// Number of peaks kept in summaries
    pub summary_limit: usize,
    /// Bin count for the value histogram
    pub histogram_bins: usize,
    /// Detect raw and filtered peaks on separate workers
    pub parallel_detection: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            filter: FilterSettings::default(),
            min_height: 5000.0,
            summary_limit: 5,
            histogram_bins: DEFAULT_BINS,
            parallel_detection: true,
        }
    }
}

impl PipelineConfig {
    pub fn with_cutoff_fraction(mut self, cutoff_fraction: f64) -> Self {
        self.filter.cutoff_fraction = cutoff_fraction;
        self
    }

    pub fn with_sampling_rate(mut self, sampling_rate: f64) -> Self {
        self.filter.sampling_rate = sampling_rate;
        self
    }

    pub fn with_min_height(mut self, min_height: f64) -> Self {
        self.min_height = min_height;
        self
    }

    pub fn with_summary_limit(mut self, summary_limit: usize) -> Self {
        self.summary_limit = summary_limit;
        self
    }

    pub fn with_histogram_bins(mut self, histogram_bins: usize) -> Self {
        self.histogram_bins = histogram_bins;
        self
    }

    pub fn with_parallel_detection(mut self, parallel_detection: bool) -> Self {
        self.parallel_detection = parallel_detection;
        self
    }

    /// Check every field, returning the first problem found
    pub fn validate(&self) -> MqResult<()> {
        self.filter_spec()?;

        if self.min_height.is_nan() {
            return Err(MqError::invalid_config("min_height must not be NaN"));
        }
        if self.histogram_bins == 0 {
            return Err(MqError::invalid_config("histogram_bins must be at least 1"));
        }

        Ok(())
    }

    /// Immutable filter specification for one run
    pub fn filter_spec(&self) -> MqResult<FilterSpec> {
        FilterSpec::new(self.filter.cutoff_fraction, self.filter.sampling_rate)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> MqResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MqError::invalid_config(format!("malformed JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> MqResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            MqError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> MqResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MqError::invalid_config(format!("cannot encode: {e}")))
    }
}
