//! Dream-window prediction pipeline.
//!
//! # Algorithm Summary
//!
//! 1. Score every REM segment against the night's heart rate
//! 2. Link every brief awakening to the REM period it interrupts
//! 3. Sort all candidates by start and merge windows closer than the merge gap
//!
//! Each call is a pure function of its inputs.

use std::fmt;

use rayon::prelude::*;
use thiserror::Error;

use crate::arousal::detect_micro_arousals;
use crate::config::{ConfigError, PredictionConfig};
use crate::merge::merge_predictions;
use crate::night::Night;
use crate::scoring::score_rem_segment;
use crate::sleep::{HeartRateSample, SleepSegment};
use crate::types::DreamPrediction;

/// Why a segment sequence was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentDefect {
    /// Starts before the previous segment starts.
    OutOfOrder,
    /// Starts before the previous segment ends.
    Overlapping,
}

impl fmt::Display for SegmentDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfOrder => write!(f, "starts before the previous segment"),
            Self::Overlapping => write!(f, "overlaps the previous segment"),
        }
    }
}

/// Errors from the checked pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    #[error("invalid input: segment {index} {defect}")]
    InvalidInput { index: usize, defect: SegmentDefect },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Predicts dream windows for one night.
///
/// Segments are assumed chronological and non-overlapping; the first
/// segment's start is taken as sleep onset. Use [`predict_checked`] to have
/// that verified.
pub fn predict(
    segments: &[SleepSegment],
    heart_rate: &[HeartRateSample],
    config: &PredictionConfig,
) -> Vec<DreamPrediction> {
    let Some(first) = segments.first() else {
        return Vec::new();
    };
    let night_start = first.interval.start();

    let mut candidates: Vec<DreamPrediction> = segments
        .iter()
        .filter(|s| s.is_rem())
        .filter_map(|rem| score_rem_segment(rem, heart_rate, night_start, config))
        .collect();
    candidates.extend(detect_micro_arousals(segments, config));

    tracing::debug!(
        segments = segments.len(),
        heart_rate = heart_rate.len(),
        candidates = candidates.len(),
        "collected dream-window candidates"
    );

    merge_predictions(candidates, config)
}

/// Like [`predict`], but rejects disordered segments and invalid configuration.
pub fn predict_checked(
    segments: &[SleepSegment],
    heart_rate: &[HeartRateSample],
    config: &PredictionConfig,
) -> Result<Vec<DreamPrediction>, PredictError> {
    config.validate()?;
    validate_segments(segments)?;
    Ok(predict(segments, heart_rate, config))
}

/// Checks that segments are chronological and non-overlapping.
///
/// Touching segments (one ends exactly when the next starts) are fine.
pub fn validate_segments(segments: &[SleepSegment]) -> Result<(), PredictError> {
    for (index, pair) in segments.windows(2).enumerate() {
        let (prev, next) = (&pair[0].interval, &pair[1].interval);
        let defect = if next.start() < prev.start() {
            Some(SegmentDefect::OutOfOrder)
        } else if next.start() < prev.end() {
            Some(SegmentDefect::Overlapping)
        } else {
            None
        };
        if let Some(defect) = defect {
            return Err(PredictError::InvalidInput {
                index: index + 1,
                defect,
            });
        }
    }
    Ok(())
}

/// Returns the segments sorted by start, then end.
///
/// Overlaps are left in place for [`validate_segments`] to report.
pub fn sort_segments(segments: &[SleepSegment]) -> Vec<SleepSegment> {
    let mut sorted = segments.to_vec();
    sorted.sort_by_key(|s| (s.interval.start(), s.interval.end()));
    sorted
}

/// Predicts every night independently, in parallel.
///
/// Output order matches input order.
pub fn predict_nights(nights: &[Night], config: &PredictionConfig) -> Vec<Vec<DreamPrediction>> {
    nights
        .par_iter()
        .map(|night| predict(&night.segments, &night.heart_rate, config))
        .collect()
}
