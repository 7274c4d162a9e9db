//! Micro-arousal detection.
//!
//! A brief awakening right after REM is a likely dream-recall moment. The
//! candidate window runs from the start of that REM period to the moment of
//! waking.

use chrono::TimeDelta;

use crate::config::PredictionConfig;
use crate::sleep::SleepSegment;
use crate::types::{Confidence, DreamPrediction, TimeInterval};

/// Returns true if the awake segment is short enough to be a micro-arousal.
///
/// Both bounds are exclusive.
pub(crate) fn is_brief_awakening(awake: &SleepSegment, config: &PredictionConfig) -> bool {
    let duration = awake.interval.duration();
    config.arousal_min() < duration && duration < config.arousal_max()
}

/// Finds the REM segment that ends just before `awake` starts.
///
/// The REM segment must end no later than the awakening begins, and less than
/// `rem_to_awake_gap_ms` before it. When several qualify, the first in
/// slice order wins.
pub fn preceding_rem<'a>(
    segments: &'a [SleepSegment],
    awake: &SleepSegment,
    config: &PredictionConfig,
) -> Option<&'a SleepSegment> {
    let awake_start = awake.interval.start();
    let max_gap = config.rem_to_awake_gap();
    segments.iter().filter(|s| s.is_rem()).find(|rem| {
        let gap = awake_start - rem.interval.end();
        TimeDelta::zero() <= gap && gap < max_gap
    })
}

/// Emits one fixed-confidence candidate per brief awakening that follows REM.
pub fn detect_micro_arousals(
    segments: &[SleepSegment],
    config: &PredictionConfig,
) -> Vec<DreamPrediction> {
    segments
        .iter()
        .filter(|s| s.is_awake())
        .filter(|awake| is_brief_awakening(awake, config))
        .filter_map(|awake| {
            let rem = preceding_rem(segments, awake, config)?;
            let interval = TimeInterval::new(rem.interval.start(), awake.interval.start()).ok()?;
            tracing::debug!(
                rem_start = %rem.interval.start(),
                awake_start = %awake.interval.start(),
                "linked micro-arousal to REM"
            );
            Some(DreamPrediction::new(
                interval,
                Confidence::clamped(config.arousal_confidence),
                config.arousal_reasoning.clone(),
            ))
        })
        .collect()
}
