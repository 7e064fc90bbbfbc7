//! Error handling for the moonquake telemetry pipeline
//!
//! Every failure the core can report is a variant of [`MqError`]. All of them
//! are terminal for the invocation that produced them: the computations are
//! deterministic, so retrying with the same input gives the same error.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type MqResult<T> = Result<T, MqError>;

/// Error type shared by every crate in the workspace
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum MqError {
    /// Bad filter or analysis parameter
    #[error("Invalid parameter {parameter}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Description of the violated constraint
        reason: String,
    },

    /// Series too short for stable zero-phase filtering
    #[error("Insufficient samples: need more than {required}, got {actual}")]
    InsufficientSamples {
        /// Samples strictly required to exceed
        required: usize,
        /// Samples provided
        actual: usize,
    },

    /// A peak index did not fit the series it was joined against
    #[error("Index {index} out of range for series of length {len}")]
    IndexOutOfRange {
        /// Offending index
        index: usize,
        /// Length of the series
        len: usize,
    },

    /// Timestamp could not be parsed or is out of range
    #[error("Invalid timestamp '{input}': {reason}")]
    InvalidTimestamp {
        /// Text or value that was rejected
        input: String,
        /// Description of timestamp issue
        reason: String,
    },

    /// Pipeline configuration failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error
        reason: String,
    },
}

impl MqError {
    /// Shorthand for [`MqError::InvalidParameter`]
    pub fn invalid_parameter(parameter: &'static str, reason: impl Into<String>) -> Self {
        MqError::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`MqError::InvalidConfig`]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        MqError::InvalidConfig {
            reason: reason.into(),
        }
    }
}
