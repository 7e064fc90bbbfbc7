//! Burst envelopes for synthetic moonquake events

use mq_core::EventKind;
use serde::{Deserialize, Serialize};

/// One event burst laid over the background channel
///
/// The envelope rises linearly over the first tenth of `duration` samples
/// and then decays exponentially, reaching about 1% of `amplitude` at the
/// end of the burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuakePattern {
    pub kind: EventKind,
    /// Sample index where the burst starts
    pub onset: usize,
    /// Burst length in samples
    pub duration: usize,
    /// Peak height above the background
    pub amplitude: f64,
}

impl QuakePattern {
    pub fn new(kind: EventKind, onset: usize, duration: usize, amplitude: f64) -> Self {
        Self {
            kind,
            onset,
            duration,
            amplitude,
        }
    }

    /// Whether `index` falls inside the burst
    pub fn covers(&self, index: usize) -> bool {
        index >= self.onset && index - self.onset < self.duration
    }

    /// Envelope value at sample `index`
    pub fn contribution(&self, index: usize) -> f64 {
        if !self.covers(index) || self.duration == 0 {
            return 0.0;
        }

        let t = (index - self.onset) as f64 / self.duration as f64;
        let rise = 0.1;
        if t < rise {
            self.amplitude * t / rise
        } else {
            self.amplitude * (-4.6 * (t - rise) / (1.0 - rise)).exp()
        }
    }

    /// Impact, deep and shallow bursts spread over `samples`
    pub fn presets(samples: usize) -> Vec<QuakePattern> {
        let duration = (samples / 10).max(1);
        vec![
            QuakePattern::new(EventKind::Impact, samples / 5, duration, 9000.0),
            QuakePattern::new(EventKind::Deep, samples / 2, duration, 6000.0),
            QuakePattern::new(EventKind::Shallow, samples * 3 / 4, duration, 7500.0),
        ]
    }
}
