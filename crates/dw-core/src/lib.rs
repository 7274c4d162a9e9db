//! Dream-window prediction engine.
//!
//! This crate turns one night's sleep-stage timeline and heart-rate series
//! into a ranked list of windows in which a dream most likely occurred:
//! - Scoring: REM confidence from duration, heart-rate variability, and time of night
//! - Arousal: brief awakenings right after REM
//! - Merging: coalescing adjacent candidate windows

mod arousal;
mod config;
mod merge;
mod night;
mod predict;
mod scoring;
mod sleep;
mod types;
mod variability;

pub use arousal::{detect_micro_arousals, preceding_rem};
pub use config::{
    AROUSAL_REASONING, ConfigError, FALLBACK_REASONING, PredictionConfig, REASONING_SEPARATOR,
    ReasoningMerge, ScoreWeights,
};
pub use merge::merge_predictions;
pub use night::{Night, NightSummary};
pub use predict::{
    PredictError, SegmentDefect, predict, predict_checked, predict_nights, sort_segments,
    validate_segments,
};
pub use scoring::{RemFactors, format_reasoning, score_rem_segment};
pub use sleep::{HeartRateSample, SleepSegment, SleepStage};
pub use types::{Confidence, DreamPrediction, TimeInterval, ValidationError};
pub use variability::heart_rate_variability;
