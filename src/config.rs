//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.shipinsight.toml` files.

use crate::analysis::DEFAULT_THRESHOLD_DAYS;
use crate::report::EXPORT_FILE_NAME;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".shipinsight.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Risk detection settings.
    #[serde(default)]
    pub risk: RiskConfig,

    /// Output settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Input dataset settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the shipment CSV.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("shipping_containers_1000.csv")
}

/// Risk detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Delay in days above which a shipment is high-risk.
    #[serde(default = "default_threshold")]
    pub threshold_days: i64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            threshold_days: default_threshold(),
        }
    }
}

fn default_threshold() -> i64 {
    DEFAULT_THRESHOLD_DAYS
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory the export is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name of the high-risk export.
    #[serde(default = "default_export_file")]
    pub export_file: String,

    /// Show every filtered record by default.
    #[serde(default)]
    pub show_records: bool,

    /// Width of the longest carrier bar.
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            export_file: default_export_file(),
            show_records: false,
            bar_width: default_bar_width(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_export_file() -> String {
    EXPORT_FILE_NAME.to_string()
}

fn default_bar_width() -> usize {
    40
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Check values the TOML schema alone cannot rule out.
    pub fn validate(&self) -> Result<()> {
        if self.risk.threshold_days < 0 {
            bail!(
                "[risk] threshold_days must be zero or more days, got {}",
                self.risk.threshold_days
            );
        }
        Ok(())
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings
    /// and only override when given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = data.clone();
        }

        if let Some(threshold) = args.threshold {
            self.risk.threshold_days = threshold;
        }

        if let Some(ref dir) = args.output_dir {
            self.report.output_dir = dir.clone();
        }

        // Flags always override
        if args.show_records {
            self.report.show_records = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
