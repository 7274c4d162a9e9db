//! Predict command for reporting dream windows.
//!
//! This module implements `dw predict` with human-readable and JSON output.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use dw_core::{DreamPrediction, Night, PredictionConfig, predict, predict_checked, sort_segments};
use serde::Serialize;

/// How the command treats the night's segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredictOptions {
    pub json: bool,
    /// Sort segments by start time first.
    pub sort: bool,
    /// Skip ordering and overlap checks.
    pub unchecked: bool,
}

// ========== Duration Formatting ==========

/// Formats milliseconds as duration string.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
/// Negative durations are treated as 0m.
pub fn format_duration(ms: i64) -> String {
    if ms < 0 {
        return "0m".to_string();
    }
    let total_minutes = ms / 60_000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

// ========== Prediction ==========

/// Runs the pipeline according to `options`.
pub fn compute(
    night: &Night,
    config: &PredictionConfig,
    options: PredictOptions,
) -> Result<Vec<DreamPrediction>> {
    let segments = if options.sort {
        sort_segments(&night.segments)
    } else {
        night.segments.clone()
    };

    if options.unchecked {
        return Ok(predict(&segments, &night.heart_rate, config));
    }

    predict_checked(&segments, &night.heart_rate, config)
        .context("cannot predict dream windows (use --sort to reorder segments)")
}

// ========== Human Output ==========

/// Formats the human-readable prediction list.
pub fn format_predictions(predictions: &[DreamPrediction]) -> String {
    let mut output = String::new();

    writeln!(output, "DREAM WINDOWS (UTC)").unwrap();
    writeln!(output, "───────────────────").unwrap();

    if predictions.is_empty() {
        writeln!(output, "No dream windows predicted.").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "Hint: windows come from REM periods and brief awakenings after REM."
        )
        .unwrap();
        return output;
    }

    for prediction in predictions {
        let interval = prediction.interval;
        let duration = format_duration(interval.duration().num_milliseconds());
        let logged = if prediction.was_logged {
            "  (logged)"
        } else {
            ""
        };
        writeln!(
            output,
            "{} - {}  {duration:>7}  {}{logged}",
            interval.start().format("%H:%M"),
            interval.end().format("%H:%M"),
            prediction.confidence,
        )
        .unwrap();
        writeln!(output, "  {}", prediction.reasoning).unwrap();
    }

    let total_ms: i64 = predictions
        .iter()
        .map(|p| p.interval.duration().num_milliseconds())
        .sum();
    writeln!(output).unwrap();
    writeln!(
        output,
        "{} window(s), {} total",
        predictions.len(),
        format_duration(total_ms)
    )
    .unwrap();

    output
}

// ========== JSON Output ==========

/// JSON prediction list.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub count: usize,
    pub predictions: Vec<JsonPrediction>,
}

#[derive(Debug, Serialize)]
pub struct JsonPrediction {
    pub start: String,
    pub end: String,
    pub duration_minutes: i64,
    pub confidence: f64,
    pub reasoning: String,
    pub was_logged: bool,
}

/// Formats predictions as JSON.
///
/// Confidence is rounded to two decimals for stable output.
pub fn format_predictions_json(predictions: &[DreamPrediction]) -> Result<String> {
    let report = JsonReport {
        count: predictions.len(),
        predictions: predictions
            .iter()
            .map(|p| JsonPrediction {
                start: p.interval.start().to_rfc3339_opts(SecondsFormat::Secs, true),
                end: p.interval.end().to_rfc3339_opts(SecondsFormat::Secs, true),
                duration_minutes: p.interval.duration().num_minutes(),
                confidence: (p.confidence.value() * 100.0).round() / 100.0,
                reasoning: p.reasoning.clone(),
                was_logged: p.was_logged,
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the predict command.
pub fn run<W: Write>(
    writer: &mut W,
    night: &Night,
    config: &PredictionConfig,
    options: PredictOptions,
) -> Result<()> {
    let predictions = compute(night, config, options)?;
    tracing::debug!(count = predictions.len(), "predicted dream windows");

    if options.json {
        writeln!(writer, "{}", format_predictions_json(&predictions)?)?;
    } else {
        write!(writer, "{}", format_predictions(&predictions))?;
    }

    Ok(())
}
