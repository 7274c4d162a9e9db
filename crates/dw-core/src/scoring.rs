//! REM confidence scoring.
//!
//! Each REM segment is scored from three factors, each saturating at 1.0:
//!
//! 1. Duration - longer REM periods carry more dream content
//! 2. Heart-rate variability during the segment
//! 3. Time since sleep onset - later REM periods are longer and denser
//!
//! The same factors drive the reasoning text, so the explanation never
//! disagrees with the score.

use chrono::{DateTime, Utc};

use crate::config::{PredictionConfig, REASONING_SEPARATOR};
use crate::sleep::{HeartRateSample, SleepSegment};
use crate::types::{Confidence, DreamPrediction};
use crate::variability::heart_rate_variability;

/// Raw measurements and normalized factors for one REM segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemFactors {
    pub duration_minutes: f64,
    /// Population standard deviation of bpm inside the segment.
    pub variability: f64,
    /// Never negative, even if the segment precedes the night start.
    pub hours_since_start: f64,
    pub duration_factor: f64,
    pub variability_factor: f64,
    pub time_of_night_factor: f64,
}

impl RemFactors {
    /// Measures a REM segment against the night's heart-rate samples.
    ///
    /// Samples are matched by inclusive containment in the segment interval;
    /// their order does not matter.
    #[allow(clippy::cast_precision_loss)]
    pub fn measure(
        segment: &SleepSegment,
        heart_rate: &[HeartRateSample],
        night_start: DateTime<Utc>,
        config: &PredictionConfig,
    ) -> Self {
        let interval = segment.interval;
        let duration_minutes = interval.duration_minutes();
        let variability = heart_rate_variability(
            heart_rate
                .iter()
                .filter(|sample| interval.contains(sample.timestamp)),
        );
        let hours_since_start =
            ((interval.start() - night_start).num_milliseconds() as f64 / 3_600_000.0).max(0.0);

        Self {
            duration_minutes,
            variability,
            hours_since_start,
            duration_factor: saturate(duration_minutes, config.duration_saturation_minutes),
            variability_factor: saturate(variability, config.variability_saturation_bpm),
            time_of_night_factor: saturate(
                hours_since_start,
                config.time_of_night_saturation_hours,
            ),
        }
    }

    /// Weighted combination of the three factors.
    pub fn confidence(&self, config: &PredictionConfig) -> f64 {
        let w = &config.weights;
        w.duration * self.duration_factor
            + w.variability * self.variability_factor
            + w.time_of_night * self.time_of_night_factor
    }
}

/// Ratio of `value` to `saturation`, capped at 1.0. Non-finite ratios count as 0.
fn saturate(value: f64, saturation: f64) -> f64 {
    let ratio = value / saturation;
    if ratio.is_finite() { ratio.min(1.0) } else { 0.0 }
}

/// Builds the explanation for a REM candidate.
///
/// Clauses appear in a fixed order and are joined with " • ". If none
/// applies, the configured fallback text is returned.
#[allow(clippy::cast_possible_truncation)]
pub fn format_reasoning(factors: &RemFactors, config: &PredictionConfig) -> String {
    let mut clauses = Vec::with_capacity(3);

    if factors.duration_minutes >= config.extended_rem_minutes {
        let minutes = factors.duration_minutes.trunc() as i64;
        clauses.push(format!("Extended REM period ({minutes} min)"));
    }
    if factors.variability > config.elevated_variability_bpm {
        clauses.push("Elevated heart rate variability".to_string());
    }
    if factors.hours_since_start > config.late_cycle_hours {
        clauses.push("Occurred in later sleep cycles".to_string());
    }

    if clauses.is_empty() {
        config.fallback_reasoning.clone()
    } else {
        clauses.join(REASONING_SEPARATOR)
    }
}

/// Scores one REM segment, returning a candidate only above the threshold.
pub fn score_rem_segment(
    segment: &SleepSegment,
    heart_rate: &[HeartRateSample],
    night_start: DateTime<Utc>,
    config: &PredictionConfig,
) -> Option<DreamPrediction> {
    let factors = RemFactors::measure(segment, heart_rate, night_start, config);
    let confidence = factors.confidence(config);

    if confidence.is_nan() || confidence <= config.min_confidence {
        tracing::debug!(
            start = %segment.interval.start(),
            confidence,
            "REM segment below confidence threshold"
        );
        return None;
    }

    tracing::debug!(
        start = %segment.interval.start(),
        confidence,
        duration_minutes = factors.duration_minutes,
        variability = factors.variability,
        "scored REM segment"
    );

    Some(DreamPrediction::new(
        segment.interval,
        Confidence::clamped(confidence),
        format_reasoning(&factors, config),
    ))
}
