//! Concurrent analysis of several missions

use crate::loader::{LoadError, MissionLoader};
use mq_core::MqError;
use mq_processing::{MissionReport, SignalPipeline};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Why one mission produced no report
#[derive(Debug, Error)]
pub enum MissionError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Analysis(#[from] MqError),

    #[error("analysis task failed: {0}")]
    Task(String),
}

/// Result for one requested mission
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MissionOutcome {
    Report(Box<MissionReport>),
    Failed { mission: String, error: String },
}

impl MissionOutcome {
    pub fn mission(&self) -> &str {
        match self {
            MissionOutcome::Report(report) => &report.mission,
            MissionOutcome::Failed { mission, .. } => mission,
        }
    }

    pub fn is_report(&self) -> bool {
        matches!(self, MissionOutcome::Report(_))
    }
}

/// Loads and analyses missions, one blocking task each
#[derive(Debug, Clone)]
pub struct MissionRunner {
    loader: MissionLoader,
    pipeline: Arc<SignalPipeline>,
    include_filtered: bool,
}

impl MissionRunner {
    pub fn new(loader: MissionLoader, pipeline: SignalPipeline) -> Self {
        Self {
            loader,
            pipeline: Arc::new(pipeline),
            include_filtered: false,
        }
    }

    pub fn with_filtered(mut self, include_filtered: bool) -> Self {
        self.include_filtered = include_filtered;
        self
    }

    /// Analyse a single mission on the current thread
    pub fn analyze(&self, mission: &str) -> Result<MissionReport, MissionError> {
        let series = self.loader.load(mission)?;
        tracing::debug!(mission, samples = series.len(), "mission loaded");
        let report =
            MissionReport::analyze(mission, &self.pipeline, &series, self.include_filtered)?;
        Ok(report)
    }

    /// Analyse every mission concurrently; outcomes keep the request order
    pub async fn run_all(&self, missions: &[String]) -> Vec<MissionOutcome> {
        let handles: Vec<_> = missions
            .iter()
            .map(|mission| {
                let runner = self.clone();
                let mission = mission.clone();
                tokio::task::spawn_blocking(move || runner.analyze(&mission))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(missions.len());
        for (mission, handle) in missions.iter().zip(handles) {
            let result = handle
                .await
                .map_err(|e| MissionError::Task(e.to_string()))
                .and_then(|r| r);

            let outcome = match result {
                Ok(report) => {
                    tracing::info!(
                        mission = %mission,
                        filtered_peaks = report.filtered_peaks.len(),
                        "mission analysed"
                    );
                    MissionOutcome::Report(Box::new(report))
                }
                Err(e) => {
                    tracing::warn!(mission = %mission, error = %e, "mission failed");
                    MissionOutcome::Failed {
                        mission: mission.clone(),
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}
