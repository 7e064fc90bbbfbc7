//! Event categories and per-category summaries

use crate::series::Series;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Category tag attached to a sample by the upstream catalogue
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// Meteoroid or artificial impact (`impact_mq`)
    Impact,
    /// Deep moonquake (`deep_mq`)
    Deep,
    /// Shallow moonquake (`shallow_mq`)
    Shallow,
    /// Any other label, kept verbatim
    Other(String),
}

impl EventKind {
    /// Parse a dataset label; unknown labels become [`EventKind::Other`]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "impact_mq" => EventKind::Impact,
            "deep_mq" => EventKind::Deep,
            "shallow_mq" => EventKind::Shallow,
            other => EventKind::Other(other.to_string()),
        }
    }

    /// Dataset label for this kind
    pub fn label(&self) -> &str {
        match self {
            EventKind::Impact => "impact_mq",
            EventKind::Deep => "deep_mq",
            EventKind::Shallow => "shallow_mq",
            EventKind::Other(label) => label,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for EventKind {
    fn from(value: String) -> Self {
        EventKind::from_label(&value)
    }
}

impl From<EventKind> for String {
    fn from(value: EventKind) -> Self {
        value.label().to_string()
    }
}

/// Occurrences of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCount {
    pub kind: EventKind,
    pub count: usize,
}

/// Per-category counts and mean relative time
///
/// Counts are ordered by descending count, ties keeping first appearance.
/// Means are `None` when the category never occurs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventBreakdown {
    pub counts: Vec<EventCount>,
    pub mean_impact: Option<f64>,
    pub mean_deep: Option<f64>,
    pub mean_shallow: Option<f64>,
}

impl EventBreakdown {
    /// Summarize the tagged samples of a series
    ///
    /// An untagged series yields an empty breakdown.
    pub fn from_series(series: &Series) -> Self {
        let mut counts: Vec<EventCount> = Vec::new();
        for kind in series.samples().iter().filter_map(|s| s.event.as_ref()) {
            match counts.iter_mut().find(|c| &c.kind == kind) {
                Some(entry) => entry.count += 1,
                None => counts.push(EventCount {
                    kind: kind.clone(),
                    count: 1,
                }),
            }
        }
        // stable sort keeps first-appearance order among equal counts
        counts.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            counts,
            mean_impact: mean_for(series, &EventKind::Impact),
            mean_deep: mean_for(series, &EventKind::Deep),
            mean_shallow: mean_for(series, &EventKind::Shallow),
        }
    }

    /// Count for one category, zero when absent
    pub fn count_of(&self, kind: &EventKind) -> usize {
        self.counts
            .iter()
            .find(|c| &c.kind == kind)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

fn mean_for(series: &Series, kind: &EventKind) -> Option<f64> {
    let (sum, n) = series
        .samples()
        .iter()
        .filter(|s| s.event.as_ref() == Some(kind))
        .fold((0.0, 0usize), |(sum, n), s| (sum + s.value, n + 1));
    (n > 0).then(|| sum / n as f64)
}
