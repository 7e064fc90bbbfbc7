//! Series: ordered container for one mission's telemetry channel

use crate::error::{MqError, MqResult};
use crate::events::EventKind;
use crate::timestamp::AbsoluteTime;
use serde::{Deserialize, Serialize};

/// One telemetry sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Absolute acquisition time
    pub timestamp: AbsoluteTime,
    /// Relative-time channel value (seconds)
    pub value: f64,
    /// Catalogue category, when the dataset carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<EventKind>,
}

impl Sample {
    pub fn new(timestamp: AbsoluteTime, value: f64) -> Self {
        Self {
            timestamp,
            value,
            event: None,
        }
    }

    pub fn with_event(mut self, event: EventKind) -> Self {
        self.event = Some(event);
        self
    }
}

/// Ordered samples, indexed 0..N-1 by ingestion order
///
/// Timestamps are expected to be non-decreasing. This is a precondition
/// supplied by ingestion and is not enforced here; see [`Series::is_time_ordered`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Build an untagged series from parallel timestamp/value slices
    pub fn from_parts(timestamps: &[AbsoluteTime], values: &[f64]) -> MqResult<Self> {
        if timestamps.len() != values.len() {
            return Err(MqError::invalid_parameter(
                "values",
                format!(
                    "length {} doesn't match {} timestamps",
                    values.len(),
                    timestamps.len()
                ),
            ));
        }
        Ok(Self {
            samples: timestamps
                .iter()
                .zip(values)
                .map(|(&t, &v)| Sample::new(t, v))
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sample at `index`, or `IndexOutOfRange`
    pub fn sample(&self, index: usize) -> MqResult<&Sample> {
        self.samples.get(index).ok_or(MqError::IndexOutOfRange {
            index,
            len: self.samples.len(),
        })
    }

    /// Value channel as a contiguous vector
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn timestamps(&self) -> Vec<AbsoluteTime> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    /// Whether any sample carries an event category
    pub fn has_event_tags(&self) -> bool {
        self.samples.iter().any(|s| s.event.is_some())
    }

    /// Check the non-decreasing timestamp precondition
    pub fn is_time_ordered(&self) -> bool {
        self.samples
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    }

    pub fn first_timestamp(&self) -> Option<AbsoluteTime> {
        self.samples.first().map(|s| s.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<AbsoluteTime> {
        self.samples.last().map(|s| s.timestamp)
    }

    /// Basic statistics of the value channel
    pub fn stats(&self) -> SeriesStats {
        let mut stats = SeriesStats::calculate(&self.values());
        stats.first_timestamp = self.first_timestamp();
        stats.last_timestamp = self.last_timestamp();
        stats
    }
}

impl From<Vec<Sample>> for Series {
    fn from(samples: Vec<Sample>) -> Self {
        Series::new(samples)
    }
}

/// Basic statistics for the value channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub first_timestamp: Option<AbsoluteTime>,
    pub last_timestamp: Option<AbsoluteTime>,
}

impl SeriesStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                count: 0,
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                first_timestamp: None,
                last_timestamp: None,
            };
        }

        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

        Self {
            count: data.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            first_timestamp: None,
            last_timestamp: None,
        }
    }
}
