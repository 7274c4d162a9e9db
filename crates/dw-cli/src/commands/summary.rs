//! Summary command for a night's stage breakdown.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use dw_core::{Night, NightSummary, PredictionConfig};

use super::predict::format_duration;

/// Formats the human-readable night summary.
#[allow(clippy::cast_possible_truncation)]
pub fn format_summary(summary: &NightSummary) -> String {
    let mut output = String::new();

    writeln!(output, "NIGHT SUMMARY").unwrap();
    writeln!(output, "─────────────").unwrap();
    writeln!(output, "Segments:        {}", summary.segment_count).unwrap();
    writeln!(output, "REM periods:     {}", summary.rem_periods).unwrap();
    writeln!(output, "REM awakenings:  {}", summary.rem_awakenings).unwrap();
    match summary.mean_bpm {
        Some(mean) => writeln!(
            output,
            "Heart rate:      {} samples, mean {mean:.1} bpm",
            summary.heart_rate_samples
        )
        .unwrap(),
        None => writeln!(output, "Heart rate:      no samples").unwrap(),
    }

    if summary.minutes_by_stage.is_empty() {
        return output;
    }

    writeln!(output).unwrap();
    writeln!(output, "BY STAGE").unwrap();
    writeln!(output, "────────").unwrap();
    for (stage, minutes) in &summary.minutes_by_stage {
        let duration = format_duration((minutes * 60_000.0).round() as i64);
        writeln!(output, "  {stage:<20}{duration:>7}").unwrap();
    }

    output
}

/// Runs the summary command.
pub fn run<W: Write>(
    writer: &mut W,
    night: &Night,
    config: &PredictionConfig,
    json: bool,
) -> Result<()> {
    let summary = NightSummary::from_night(night, config);

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        write!(writer, "{}", format_summary(&summary))?;
    }

    Ok(())
}
