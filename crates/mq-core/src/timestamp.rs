//! Absolute timestamps for mission telemetry
//!
//! Microsecond-resolution points in time, stored as signed microseconds since
//! the Unix epoch. Mission datasets write them as `%Y-%m-%dT%H:%M:%S.%f`.

use crate::error::{MqError, MqResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use core::fmt;
use core::ops::{Add, Sub};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Layout used by the `time_abs` column of mission datasets
pub const DATASET_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const MICROS_PER_SEC: i64 = 1_000_000;

/// Point in time with microsecond resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct AbsoluteTime {
    /// Microseconds since Unix epoch
    micros: i64,
}

impl AbsoluteTime {
    /// Create a timestamp from microseconds since Unix epoch
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Self { micros }
    }

    /// Create a timestamp from milliseconds since Unix epoch
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self {
            micros: millis * 1_000,
        }
    }

    /// Create a timestamp from whole seconds since Unix epoch
    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        Self {
            micros: secs * MICROS_PER_SEC,
        }
    }

    /// Microseconds since Unix epoch
    #[inline]
    pub const fn as_micros(&self) -> i64 {
        self.micros
    }

    /// Fractional seconds since Unix epoch
    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.micros as f64 / MICROS_PER_SEC as f64
    }

    /// Parse the dataset layout, e.g. `1970-01-19T20:25:00.020000`
    pub fn parse(input: &str) -> MqResult<Self> {
        let trimmed = input.trim();
        let naive = NaiveDateTime::parse_from_str(trimmed, DATASET_TIME_FORMAT).map_err(|e| {
            MqError::InvalidTimestamp {
                input: trimmed.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self::from_micros(naive.and_utc().timestamp_micros()))
    }

    /// Convert to a chrono UTC datetime
    pub fn to_datetime(&self) -> MqResult<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_micros(self.micros).ok_or_else(|| {
            MqError::InvalidTimestamp {
                input: self.micros.to_string(),
                reason: "outside the representable calendar range".to_string(),
            }
        })
    }

    /// Signed span from `earlier` to `self`
    #[inline]
    pub fn since(&self, earlier: AbsoluteTime) -> Span {
        Span::from_micros(self.micros - earlier.micros)
    }

    /// Shift by a span, failing on overflow
    pub fn checked_add(&self, span: Span) -> MqResult<AbsoluteTime> {
        self.micros
            .checked_add(span.as_micros())
            .map(AbsoluteTime::from_micros)
            .ok_or_else(|| MqError::InvalidTimestamp {
                input: self.micros.to_string(),
                reason: "timestamp overflow".to_string(),
            })
    }
}

impl FromStr for AbsoluteTime {
    type Err = MqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AbsoluteTime::parse(s)
    }
}

impl fmt::Display for AbsoluteTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp_micros(self.micros) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.6f")),
            None => write!(f, "{}us", self.micros),
        }
    }
}

/// Signed time span with microsecond resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Span {
    micros: i64,
}

impl Span {
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Self { micros }
    }

    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        Self {
            micros: secs * MICROS_PER_SEC,
        }
    }

    #[inline]
    pub const fn as_micros(&self) -> i64 {
        self.micros
    }

    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.micros as f64 / MICROS_PER_SEC as f64
    }
}

impl Add for Span {
    type Output = Span;

    #[inline]
    fn add(self, other: Span) -> Span {
        Span::from_micros(self.micros + other.micros)
    }
}

impl Sub for Span {
    type Output = Span;

    #[inline]
    fn sub(self, other: Span) -> Span {
        Span::from_micros(self.micros - other.micros)
    }
}
