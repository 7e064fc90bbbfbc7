//! MQ-Core: Foundation types for mission telemetry
//!
//! Samples, series, timestamps, event categories and the shared error type.

pub mod error;
pub mod events;
pub mod histogram;
pub mod series;
pub mod timestamp;

pub use error::{MqError, MqResult};
pub use events::{EventBreakdown, EventCount, EventKind};
pub use histogram::{Bin, Histogram, DEFAULT_BINS};
pub use series::{Sample, Series, SeriesStats};
pub use timestamp::{AbsoluteTime, Span};
