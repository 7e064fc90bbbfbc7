//! Synthetic mission telemetry with seeded noise and event bursts

use crate::patterns::QuakePattern;
use mq_core::{AbsoluteTime, MqError, MqResult, Sample, Series, Span};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Configuration for telemetry simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Number of samples to generate
    pub samples: usize,
    /// Timestamp of the first sample
    pub start: AbsoluteTime,
    /// Spacing between consecutive samples
    pub cadence: Span,
    /// Background level of the value channel
    pub baseline: f64,
    /// Standard deviation of the Gaussian background noise
    pub noise_std: f64,
    /// Bursts to overlay; `None` uses [`QuakePattern::presets`]
    pub bursts: Option<Vec<QuakePattern>>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            samples: 2000,
            // 1970-01-19T00:00:00, the start of the catalogue day
            start: AbsoluteTime::from_secs(18 * 86_400),
            cadence: Span::from_secs(1),
            baseline: 3000.0,
            noise_std: 400.0,
            bursts: None,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_noise_std(mut self, noise_std: f64) -> Self {
        self.noise_std = noise_std;
        self
    }

    pub fn with_bursts(mut self, bursts: Vec<QuakePattern>) -> Self {
        self.bursts = Some(bursts);
        self
    }
}

/// Telemetry generator
///
/// Every sample inside a burst is tagged with that burst's category; samples
/// outside all bursts are untagged.
pub struct TelemetrySimulator {
    config: SimulatorConfig,
    bursts: Vec<QuakePattern>,
    noise: Normal<f64>,
    seed: u64,
}

impl TelemetrySimulator {
    /// Create new simulator with configuration
    pub fn new(config: SimulatorConfig) -> MqResult<Self> {
        if !config.noise_std.is_finite() || config.noise_std < 0.0 {
            return Err(MqError::invalid_parameter(
                "noise_std",
                format!("must be finite and non-negative, got {}", config.noise_std),
            ));
        }
        let noise = Normal::new(0.0, config.noise_std).map_err(|e| {
            MqError::invalid_parameter("noise_std", format!("cannot build noise: {e}"))
        })?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let bursts = config
            .bursts
            .clone()
            .unwrap_or_else(|| QuakePattern::presets(config.samples));

        Ok(Self {
            config,
            bursts,
            noise,
            seed,
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate the series; repeated calls give identical output
    pub fn generate(&self) -> Series {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let cadence = self.config.cadence.as_micros();
        let start = self.config.start.as_micros();

        (0..self.config.samples)
            .map(|i| {
                let offset = cadence.saturating_mul(i as i64);
                let timestamp = AbsoluteTime::from_micros(start.saturating_add(offset));

                let mut value = self.config.baseline + self.noise.sample(&mut rng);
                let mut event = None;
                for burst in &self.bursts {
                    if burst.covers(i) {
                        value += burst.contribution(i);
                        event.get_or_insert_with(|| burst.kind.clone());
                    }
                }

                let sample = Sample::new(timestamp, value.max(0.0));
                match event {
                    Some(kind) => sample.with_event(kind),
                    None => sample,
                }
            })
            .collect::<Vec<_>>()
            .into()
    }
}
