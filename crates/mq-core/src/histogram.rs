//! Equal-width histogram of a value channel

use crate::error::{MqError, MqResult};
use serde::{Deserialize, Serialize};

/// Default bin count for relative-time distributions
pub const DEFAULT_BINS: usize = 30;

/// One histogram bin covering `[start, end)`; the last bin is closed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width bins spanning the finite range of the input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width intervals over `[min, max]`
    ///
    /// Non-finite values are skipped. A constant input puts every sample in
    /// the first bin.
    pub fn from_values(values: &[f64], bins: usize) -> MqResult<Self> {
        if bins == 0 {
            return Err(MqError::invalid_parameter("bins", "must be at least 1"));
        }

        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Ok(Self::default());
        }

        let min = finite.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = finite.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let n = bins as f64;
        let spread = max > min;
        // scaled before subtracting so wide finite ranges stay finite
        let width = if spread { max / n - min / n } else { 1.0 };
        let edge = |i: usize| {
            if spread {
                let t = i as f64 / n;
                min * (1.0 - t) + max * t
            } else {
                min + i as f64
            }
        };

        let mut out: Vec<Bin> = (0..bins)
            .map(|i| Bin {
                start: edge(i),
                end: edge(i + 1),
                count: 0,
            })
            .collect();

        for v in finite {
            let idx = ((v / width - min / width) as usize).min(bins - 1);
            out[idx].count += 1;
        }

        Ok(Self { bins: out })
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_input() {
        let values: Vec<f64> = (0..100).map(|i| i as f64 * 0.37).collect();
        let hist = Histogram::from_values(&values, DEFAULT_BINS).unwrap();
        assert_eq!(hist.bins.len(), 30);
        assert_eq!(hist.total(), 100);
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let hist = Histogram::from_values(&[0.0, 5.0, 10.0], 2).unwrap();
        assert_eq!(hist.bins[0].count, 1);
        assert_eq!(hist.bins[1].count, 2);
        assert_eq!(hist.bins[1].end, 10.0);
    }

    #[test]
    fn test_extreme_range() {
        let hist = Histogram::from_values(&[-1e308, 0.0, 1e308], 3).unwrap();
        let counts: Vec<usize> = hist.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1]);
        assert!(hist.bins.iter().all(|b| b.start.is_finite() && b.end.is_finite()));
        assert_eq!(hist.bins[2].end, 1e308);
    }

    #[test]
    fn test_constant_input() {
        let hist = Histogram::from_values(&[3.0; 7], 4).unwrap();
        assert_eq!(hist.bins[0].count, 7);
        assert_eq!(hist.total(), 7);
    }

    #[test]
    fn test_empty_and_invalid() {
        assert!(Histogram::from_values(&[], 10).unwrap().is_empty());
        assert!(Histogram::from_values(&[f64::NAN], 10).unwrap().is_empty());
        assert!(Histogram::from_values(&[1.0], 0).is_err());
    }
}
