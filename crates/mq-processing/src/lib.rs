//! MQ-Processing: filtering and peak detection for mission telemetry
//!
//! Fourth-order Butterworth design, zero-phase filtering, threshold peak
//! detection and the pipeline that ties them together.

pub mod config;
pub mod filters;
pub mod metrics;
pub mod peaks;
pub mod pipeline;
pub mod report;
pub mod summary;

pub use config::{FilterSettings, PipelineConfig};
pub use filters::{filtfilt, FilterCoefficients, FilterDesigner, FilterSpec, ZeroPhaseFilter};
pub use metrics::{Stage, StageMetrics, StageTimer};
pub use peaks::{detect, PeakDetector, PeakSet};
pub use pipeline::{FilteredSeries, PipelineResult, SignalPipeline};
pub use report::MissionReport;
pub use summary::{summarize, PeakRecord, PeakSummarizer};
