//! One night of input data and its summary statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::arousal::{is_brief_awakening, preceding_rem};
use crate::config::PredictionConfig;
use crate::sleep::{HeartRateSample, SleepSegment};

/// Sleep segments and heart-rate samples for one night.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Night {
    pub segments: Vec<SleepSegment>,
    #[serde(default, alias = "heartRate")]
    pub heart_rate: Vec<HeartRateSample>,
}

/// Aggregate view of a night, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NightSummary {
    pub segment_count: usize,
    /// Minutes spent in each stage that occurs at least once.
    pub minutes_by_stage: BTreeMap<String, f64>,
    pub rem_periods: usize,
    /// Brief awakenings directly following REM.
    pub rem_awakenings: usize,
    pub heart_rate_samples: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_bpm: Option<f64>,
}

impl NightSummary {
    #[allow(clippy::cast_precision_loss)]
    pub fn from_night(night: &Night, config: &PredictionConfig) -> Self {
        let mut minutes_by_stage = BTreeMap::new();
        for segment in &night.segments {
            *minutes_by_stage
                .entry(segment.stage.to_string())
                .or_insert(0.0) += segment.interval.duration_minutes();
        }

        let rem_periods = night.segments.iter().filter(|s| s.is_rem()).count();

        let rem_awakenings = night
            .segments
            .iter()
            .filter(|s| s.is_awake())
            .filter(|awake| is_brief_awakening(awake, config))
            .filter(|awake| preceding_rem(&night.segments, awake, config).is_some())
            .count();

        let mean_bpm = if night.heart_rate.is_empty() {
            None
        } else {
            let total: f64 = night.heart_rate.iter().map(|s| s.bpm).sum();
            Some(total / night.heart_rate.len() as f64)
        };

        Self {
            segment_count: night.segments.len(),
            minutes_by_stage,
            rem_periods,
            rem_awakenings,
            heart_rate_samples: night.heart_rate.len(),
            mean_bpm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleep::SleepStage;
    use crate::types::TimeInterval;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 23, 0, 0)
            .single()
            .expect("valid test timestamp")
            + Duration::minutes(minutes)
    }

    fn seg(start: i64, end: i64, stage: SleepStage) -> SleepSegment {
        SleepSegment::new(TimeInterval::new(ts(start), ts(end)).unwrap(), stage)
    }

    #[test]
    fn summary_counts_stages_and_awakenings() {
        let night = Night {
            segments: vec![
                seg(0, 60, SleepStage::Core),
                seg(60, 90, SleepStage::Deep),
                seg(90, 110, SleepStage::Rem),
                seg(110, 112, SleepStage::Awake),
                seg(112, 150, SleepStage::Core),
                seg(150, 170, SleepStage::Rem),
                seg(170, 200, SleepStage::Awake),
            ],
            heart_rate: vec![
                HeartRateSample::new(ts(10), 60.0),
                HeartRateSample::new(ts(100), 70.0),
            ],
        };

        let summary = NightSummary::from_night(&night, &PredictionConfig::default());
        assert_eq!(summary.segment_count, 7);
        assert_eq!(summary.rem_periods, 2);
        // The 30-minute awakening is too long to count
        assert_eq!(summary.rem_awakenings, 1);
        assert_eq!(summary.heart_rate_samples, 2);
        assert_eq!(summary.mean_bpm, Some(65.0));
        assert_eq!(summary.minutes_by_stage.get("core"), Some(&98.0));
        assert_eq!(summary.minutes_by_stage.get("rem"), Some(&40.0));
        assert!(!summary.minutes_by_stage.contains_key("in_bed"));
    }

    #[test]
    fn night_accepts_camel_case_heart_rate_and_missing_samples() {
        let json = r#"{
            "segments": [{"start": "2025-03-10T23:00:00Z", "end": "2025-03-10T23:30:00Z", "stage": "core"}],
            "heartRate": [{"timestamp": "2025-03-10T23:05:00Z", "bpm": 58.5}]
        }"#;
        let night: Night = serde_json::from_str(json).unwrap();
        assert_eq!(night.heart_rate.len(), 1);

        let json = r#"{"segments": []}"#;
        let night: Night = serde_json::from_str(json).unwrap();
        assert!(night.heart_rate.is_empty());
    }
}
