//! Validate command for checking segment ordering.

use std::io::Write;

use anyhow::{Context, Result};
use dw_core::{Night, validate_segments};

/// Runs the validate command.
///
/// Returns an error when segments are out of order or overlap.
pub fn run<W: Write>(writer: &mut W, night: &Night) -> Result<()> {
    validate_segments(&night.segments).context("night export is not a valid timeline")?;

    writeln!(
        writer,
        "OK: {} segment(s), chronological and non-overlapping",
        night.segments.len()
    )?;
    Ok(())
}
