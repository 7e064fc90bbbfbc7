//! Threshold peak detection

use serde::{Deserialize, Serialize};

/// Ascending indices of peaks found in one signal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeakSet {
    indices: Vec<usize>,
}

impl PeakSet {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &usize> + '_ {
        self.indices.iter()
    }

    /// The first `limit` indices in ascending order
    pub fn head(&self, limit: usize) -> &[usize] {
        &self.indices[..limit.min(self.indices.len())]
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }
}

impl From<PeakSet> for Vec<usize> {
    fn from(value: PeakSet) -> Self {
        value.indices
    }
}

/// Strict local-maximum detector with a minimum height
///
/// Index `i` is a peak when `0 < i < len - 1`, it is strictly greater than
/// both neighbours and `signal[i] >= min_height`. Plateaus never qualify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakDetector {
    min_height: f64,
}

impl PeakDetector {
    pub fn new(min_height: f64) -> Self {
        Self { min_height }
    }

    pub fn min_height(&self) -> f64 {
        self.min_height
    }

    pub fn detect(&self, signal: &[f64]) -> PeakSet {
        if signal.len() < 3 {
            return PeakSet::default();
        }

        let indices = signal
            .windows(3)
            .enumerate()
            .filter(|(_, w)| w[1] > w[0] && w[1] > w[2] && w[1] >= self.min_height)
            .map(|(i, _)| i + 1)
            .collect();

        PeakSet { indices }
    }
}

/// Peaks of `signal` at or above `min_height`
pub fn detect(signal: &[f64], min_height: f64) -> PeakSet {
    PeakDetector::new(min_height).detect(signal)
}
