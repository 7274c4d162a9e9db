//! Configuration loading and management.

use std::path::{Path, PathBuf};

use dw_core::PredictionConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Heuristic constants for the prediction engine.
    #[serde(default)]
    pub prediction: PredictionConfig,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, the user config file, `config_path`,
    /// then `DW_*` environment variables (`__` separates nested keys, e.g.
    /// `DW_PREDICTION__MERGE_GAP_MS`).
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("DW_").split("__"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for dw.
///
/// On Linux: `~/.config/dw`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dw"))
}
