//! Night export parsing.
//!
//! A night export is a JSON object with `segments` and `heart_rate` arrays.
//! Malformed entries are skipped with a warning so one bad record does not
//! discard the whole night.

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use dw_core::{HeartRateSample, Night, SleepSegment};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize)]
struct RawNight {
    segments: Vec<serde_json::Value>,
    #[serde(default, alias = "heartRate")]
    heart_rate: Vec<serde_json::Value>,
}

/// Reads a night export from `path`, or from stdin when `path` is `-`.
pub fn read_night(path: &Path) -> Result<Night> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read night export from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    parse_night(&content)
}

/// Parses a night export, skipping entries that fail to deserialize.
pub fn parse_night(content: &str) -> Result<Night> {
    let raw: RawNight = serde_json::from_str(content).context("invalid night export JSON")?;

    Ok(Night {
        segments: parse_entries::<SleepSegment>(raw.segments, "segment"),
        heart_rate: parse_entries::<HeartRateSample>(raw.heart_rate, "heart rate sample"),
    })
}

fn parse_entries<T: DeserializeOwned>(values: Vec<serde_json::Value>, kind: &str) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(index = idx, error = %err, "skipping malformed {kind}");
                None
            }
        })
        .collect()
}
