//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Dream-window predictor.
///
/// Reads one night of sleep stages and heart rate, and reports the windows
/// in which a dream most likely occurred.
#[derive(Debug, Parser)]
#[command(name = "dw", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Predict dream windows for a night export.
    Predict {
        /// Night export JSON file, or `-` for stdin.
        file: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,

        /// Sort segments by start time before validating.
        #[arg(long)]
        sort: bool,

        /// Skip segment ordering checks.
        #[arg(long)]
        unchecked: bool,
    },

    /// Summarize stages and heart rate for a night export.
    Summary {
        /// Night export JSON file, or `-` for stdin.
        file: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check that a night's segments are ordered and non-overlapping.
    Validate {
        /// Night export JSON file, or `-` for stdin.
        file: PathBuf,
    },
}
