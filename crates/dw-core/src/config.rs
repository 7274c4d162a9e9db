//! Heuristic constants for dream-window prediction.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasoning shown when a REM period triggers none of the specific clauses.
pub const FALLBACK_REASONING: &str = "REM sleep period with dream potential";

/// Reasoning attached to every micro-arousal candidate.
pub const AROUSAL_REASONING: &str =
    "Brief awakening from REM sleep suggests potential dream recall moment";

/// Separator between reasoning clauses.
pub const REASONING_SEPARATOR: &str = " • ";

/// Errors from an inconsistent [`PredictionConfig`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("weight `{name}` must be non-negative, got {value}")]
    NegativeWeight { name: &'static str, value: f64 },

    #[error("scoring weights must sum to at most 1.0, got {sum}")]
    WeightsExceedOne { sum: f64 },

    #[error("`{name}` must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("`{name}` must be non-negative, got {value_ms}ms")]
    NegativeDuration { name: &'static str, value_ms: i64 },

    #[error("micro-arousal bounds are inverted: min {min_ms}ms >= max {max_ms}ms")]
    InvertedArousalBounds { min_ms: i64, max_ms: i64 },

    #[error("confidence `{name}` must be within [0.0, 1.0], got {value}")]
    ConfidenceOutOfRange { name: &'static str, value: f64 },
}

/// Weights of the REM confidence combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub duration: f64,
    pub variability: f64,
    pub time_of_night: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            duration: 0.4,
            variability: 0.3,
            time_of_night: 0.3,
        }
    }
}

impl ScoreWeights {
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.duration + self.variability + self.time_of_night
    }
}

/// What a merged window keeps as its reasoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningMerge {
    /// Keep the earlier candidate's text.
    #[default]
    KeepFirst,
    /// Join distinct texts with the clause separator.
    Concatenate,
}

/// Configuration for dream-window prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Relative weight of each REM factor.
    pub weights: ScoreWeights,

    /// REM length at which the duration factor saturates.
    /// Default: 20 minutes.
    pub duration_saturation_minutes: f64,

    /// Standard deviation at which the variability factor saturates.
    /// Default: 10 bpm.
    pub variability_saturation_bpm: f64,

    /// Hours after sleep onset at which the time-of-night factor saturates.
    /// Default: 6 hours.
    pub time_of_night_saturation_hours: f64,

    /// REM candidates must score strictly above this to be emitted.
    /// Default: 0.3.
    pub min_confidence: f64,

    /// Minimum REM length for the "Extended REM period" clause.
    pub extended_rem_minutes: f64,

    /// Variability above which the "Elevated heart rate variability" clause applies.
    pub elevated_variability_bpm: f64,

    /// Hours after onset beyond which the "later sleep cycles" clause applies.
    pub late_cycle_hours: f64,

    /// Awakenings must last longer than this to count as micro-arousals.
    /// Default: 30000 (30 seconds).
    pub arousal_min_ms: i64,

    /// Awakenings must last shorter than this to count as micro-arousals.
    /// Default: 300000 (5 minutes).
    pub arousal_max_ms: i64,

    /// A REM period ending less than this before an awakening is linked to it.
    /// Default: 60000 (1 minute).
    pub rem_to_awake_gap_ms: i64,

    /// Fixed confidence of micro-arousal candidates.
    pub arousal_confidence: f64,

    /// Candidates starting less than this after the previous window ends are merged.
    /// Default: 300000 (5 minutes).
    pub merge_gap_ms: i64,

    /// How merged windows combine reasoning text.
    pub reasoning_merge: ReasoningMerge,

    pub fallback_reasoning: String,

    pub arousal_reasoning: String,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            duration_saturation_minutes: 20.0,
            variability_saturation_bpm: 10.0,
            time_of_night_saturation_hours: 6.0,
            min_confidence: 0.3,
            extended_rem_minutes: 15.0,
            elevated_variability_bpm: 8.0,
            late_cycle_hours: 4.0,
            arousal_min_ms: 30_000, // 30 seconds
            arousal_max_ms: 300_000, // 5 minutes
            rem_to_awake_gap_ms: 60_000, // 1 minute
            arousal_confidence: 0.75,
            merge_gap_ms: 300_000, // 5 minutes
            reasoning_merge: ReasoningMerge::KeepFirst,
            fallback_reasoning: FALLBACK_REASONING.to_string(),
            arousal_reasoning: AROUSAL_REASONING.to_string(),
        }
    }
}

impl PredictionConfig {
    /// Checks that the configuration keeps every confidence within \[0, 1\].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("weights.duration", self.weights.duration),
            ("weights.variability", self.weights.variability),
            ("weights.time_of_night", self.weights.time_of_night),
        ];
        for (name, value) in weights {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::NegativeWeight { name, value });
            }
        }
        let sum = self.weights.sum();
        // Small tolerance so 0.4 + 0.3 + 0.3 is not rejected for rounding
        if sum > 1.0 + 1e-9 {
            return Err(ConfigError::WeightsExceedOne { sum });
        }

        let saturations = [
            (
                "duration_saturation_minutes",
                self.duration_saturation_minutes,
            ),
            ("variability_saturation_bpm", self.variability_saturation_bpm),
            (
                "time_of_night_saturation_hours",
                self.time_of_night_saturation_hours,
            ),
        ];
        for (name, value) in saturations {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        let durations = [
            ("arousal_min_ms", self.arousal_min_ms),
            ("rem_to_awake_gap_ms", self.rem_to_awake_gap_ms),
            ("merge_gap_ms", self.merge_gap_ms),
        ];
        for (name, value_ms) in durations {
            if value_ms < 0 {
                return Err(ConfigError::NegativeDuration { name, value_ms });
            }
        }

        if self.arousal_min_ms >= self.arousal_max_ms {
            return Err(ConfigError::InvertedArousalBounds {
                min_ms: self.arousal_min_ms,
                max_ms: self.arousal_max_ms,
            });
        }

        let confidences = [
            ("min_confidence", self.min_confidence),
            ("arousal_confidence", self.arousal_confidence),
        ];
        for (name, value) in confidences {
            if value.is_nan() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ConfidenceOutOfRange { name, value });
            }
        }

        Ok(())
    }

    /// Lower micro-arousal duration bound.
    pub const fn arousal_min(&self) -> TimeDelta {
        millis(self.arousal_min_ms)
    }

    /// Upper micro-arousal duration bound.
    pub const fn arousal_max(&self) -> TimeDelta {
        millis(self.arousal_max_ms)
    }

    /// Maximum distance between a REM end and the awakening it explains.
    pub const fn rem_to_awake_gap(&self) -> TimeDelta {
        millis(self.rem_to_awake_gap_ms)
    }

    /// Merge gap, never below zero so merged output cannot overlap.
    pub const fn merge_gap(&self) -> TimeDelta {
        if self.merge_gap_ms < 0 {
            TimeDelta::zero()
        } else {
            millis(self.merge_gap_ms)
        }
    }
}

/// Converts milliseconds, saturating where chrono's range ends.
const fn millis(ms: i64) -> TimeDelta {
    match TimeDelta::try_milliseconds(ms) {
        Some(delta) => delta,
        None if ms < 0 => TimeDelta::MIN,
        None => TimeDelta::MAX,
    }
}
