//! Sleep-stage timeline and heart-rate inputs.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{TimeInterval, ValidationError};

/// Classified sleep stage, as reported by the health-data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SleepStage {
    InBed,
    Awake,
    Rem,
    /// Light sleep.
    Core,
    Deep,
    AsleepUnspecified,
}

impl SleepStage {
    /// All stages in display order.
    pub const ALL: [Self; 6] = [
        Self::InBed,
        Self::Awake,
        Self::Rem,
        Self::Core,
        Self::Deep,
        Self::AsleepUnspecified,
    ];

    /// Canonical tag used in night exports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InBed => "in_bed",
            Self::Awake => "awake",
            Self::Rem => "rem",
            Self::Core => "core",
            Self::Deep => "deep",
            Self::AsleepUnspecified => "asleep_unspecified",
        }
    }
}

impl fmt::Display for SleepStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SleepStage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_bed" | "inbed" => Ok(Self::InBed),
            "awake" => Ok(Self::Awake),
            "rem" => Ok(Self::Rem),
            "core" | "light" => Ok(Self::Core),
            "deep" => Ok(Self::Deep),
            "asleep_unspecified" | "asleep" => Ok(Self::AsleepUnspecified),
            _ => Err(ValidationError::UnknownSleepStage {
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for SleepStage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SleepStage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One classified stretch of the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepSegment {
    #[serde(flatten)]
    pub interval: TimeInterval,
    pub stage: SleepStage,
}

impl SleepSegment {
    #[must_use]
    pub const fn new(interval: TimeInterval, stage: SleepStage) -> Self {
        Self { interval, stage }
    }

    #[must_use]
    pub const fn is_rem(&self) -> bool {
        matches!(self.stage, SleepStage::Rem)
    }

    #[must_use]
    pub const fn is_awake(&self) -> bool {
        matches!(self.stage, SleepStage::Awake)
    }
}

/// A single heart-rate reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartRateSample {
    pub timestamp: DateTime<Utc>,
    pub bpm: f64,
}

impl HeartRateSample {
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, bpm: f64) -> Self {
        Self { timestamp, bpm }
    }
}
