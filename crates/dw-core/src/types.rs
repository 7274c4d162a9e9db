//! Core value types with validation.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The interval ends before it starts.
    #[error("interval end {end} is before start {start}")]
    InvertedInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Unrecognized sleep stage tag.
    #[error("unknown sleep stage: {value}")]
    UnknownSleepStage { value: String },
}

/// A closed time range with `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeInterval {
    /// Creates an interval, rejecting `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvertedInterval { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Duration in fractional minutes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_minutes(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / 60_000.0
    }

    /// Returns true if `instant` lies within the interval, bounds included.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Returns an interval spanning from this start to `other`'s end.
    ///
    /// The end never moves earlier than this interval's own end.
    #[must_use]
    pub fn extend_to(&self, other: &Self) -> Self {
        Self {
            start: self.start,
            end: self.end.max(other.end),
        }
    }
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl<'de> Deserialize<'de> for TimeInterval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawInterval::deserialize(deserializer)?;
        Self::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}

/// A confidence score in the range \[0.0, 1.0\].
///
/// A heuristic score, not a calibrated probability.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Confidence(f64);

impl Confidence {
    /// Creates a confidence value, clamping to \[0.0, 1.0\].
    ///
    /// NaN values become 0.0. Values outside the range are clamped.
    #[must_use]
    pub const fn clamped(value: f64) -> Self {
        if value.is_nan() || value < 0.0 {
            Self(0.0)
        } else if value > 1.0 {
            Self(1.0)
        } else {
            Self(value)
        }
    }

    /// Returns the inner f64 value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns the larger of two confidences.
    #[must_use]
    pub const fn max(self, other: Self) -> Self {
        if other.0 > self.0 { other } else { self }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Confidence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Ok(Self::clamped(value))
    }
}

/// A candidate or final dream window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreamPrediction {
    /// When the dream most likely occurred.
    pub interval: TimeInterval,
    /// Heuristic likelihood score.
    pub confidence: Confidence,
    /// Human-readable justification.
    pub reasoning: String,
    /// Set by the journaling layer once a user entry confirms the window.
    #[serde(default)]
    pub was_logged: bool,
}

impl DreamPrediction {
    /// Creates an engine-produced prediction; `was_logged` starts false.
    #[must_use]
    pub fn new(interval: TimeInterval, confidence: Confidence, reasoning: impl Into<String>) -> Self {
        Self {
            interval,
            confidence,
            reasoning: reasoning.into(),
            was_logged: false,
        }
    }

    /// Marks this window as confirmed by a journal entry.
    pub const fn mark_logged(&mut self) {
        self.was_logged = true;
    }
}
