//! Peak summaries joined back to their source samples

use crate::peaks::PeakSet;
use mq_core::{AbsoluteTime, MqError, MqResult, Series};
use serde::{Deserialize, Serialize};

/// One summarized peak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakRecord {
    pub index: usize,
    pub timestamp: AbsoluteTime,
    pub raw_value: f64,
    pub filtered_value: f64,
}

/// Keeps the first `limit` peaks by position
///
/// Selection is positional: the earliest peaks are reported, not the
/// largest ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakSummarizer {
    limit: usize,
}

impl PeakSummarizer {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn summarize(
        &self,
        series: &Series,
        filtered: &[f64],
        peaks: &PeakSet,
    ) -> MqResult<Vec<PeakRecord>> {
        summarize(series, filtered, peaks, self.limit)
    }
}

/// Join the first `limit` indices of `peaks` against `series` and `filtered`
///
/// Fails with [`MqError::IndexOutOfRange`] when an index does not fit either
/// input, which means `peaks` was produced from a different signal.
pub fn summarize(
    series: &Series,
    filtered: &[f64],
    peaks: &PeakSet,
    limit: usize,
) -> MqResult<Vec<PeakRecord>> {
    peaks
        .head(limit)
        .iter()
        .map(|&index| {
            let sample = series.sample(index)?;
            let filtered_value =
                filtered
                    .get(index)
                    .copied()
                    .ok_or(MqError::IndexOutOfRange {
                        index,
                        len: filtered.len(),
                    })?;
            Ok(PeakRecord {
                index,
                timestamp: sample.timestamp,
                raw_value: sample.value,
                filtered_value,
            })
        })
        .collect()
}
