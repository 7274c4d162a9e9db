use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dw_cli::commands::predict::PredictOptions;
use dw_cli::commands::{predict, summary, validate};
use dw_cli::{Cli, Commands, Config, input};

/// Load and validate configuration.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    config
        .prediction
        .validate()
        .context("invalid prediction configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON output on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Predict {
            file,
            json,
            sort,
            unchecked,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let night = input::read_night(file)?;
            let options = PredictOptions {
                json: *json,
                sort: *sort,
                unchecked: *unchecked,
            };
            predict::run(&mut stdout, &night, &config.prediction, options)?;
        }
        Some(Commands::Summary { file, json }) => {
            let config = load_config(cli.config.as_deref())?;
            let night = input::read_night(file)?;
            summary::run(&mut stdout, &night, &config.prediction, *json)?;
        }
        Some(Commands::Validate { file }) => {
            let night = input::read_night(file)?;
            validate::run(&mut stdout, &night)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
