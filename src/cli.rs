//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// ShipInsight - shipping container delay dashboard
///
/// Loads a CSV of container arrivals, filters by carrier, flags
/// shipments delayed past the risk threshold and exports them.
///
/// Examples:
///   shipinsight
///   shipinsight --data shipments.csv --carrier Maersk,MSC
///   shipinsight --report dashboard.md --show-records
///   shipinsight --report dashboard.json --format json --no-export
///   shipinsight --interactive
///   shipinsight --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the shipment CSV
    ///
    /// Defaults to shipping_containers_1000.csv or the [data] path from config.
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Carriers to include (comma-separated)
    ///
    /// Defaults to every carrier in the dataset.
    /// Example: --carrier Maersk,"CMA CGM"
    #[arg(short = 'C', long, value_name = "NAMES", value_delimiter = ',')]
    pub carrier: Option<Vec<String>>,

    /// Delay in days above which a shipment is high-risk
    #[arg(short, long, value_name = "DAYS")]
    pub threshold: Option<i64>,

    /// Directory the high-risk export is written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip writing high_risk_alerts.csv
    #[arg(long)]
    pub no_export: bool,

    /// Write the full dashboard to this file
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Report format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Include every filtered shipment in the output
    #[arg(long)]
    pub show_records: bool,

    /// Open a prompt that re-runs the dashboard on each selection change
    #[arg(short, long)]
    pub interactive: bool,

    /// Exit with code 2 when any shipment exceeds the threshold
    ///
    /// Useful for scheduled checks.
    #[arg(long)]
    pub fail_on_alert: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .shipinsight.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Generate a default .shipinsight.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no dashboard)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the report file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref data) = self.data {
            if data.as_os_str().is_empty() {
                return Err("Data path must not be empty".to_string());
            }
        }

        if let Some(threshold) = self.threshold {
            if threshold < 0 {
                return Err("Threshold must be zero or more days".to_string());
            }
        }

        if self.format == OutputFormat::Json && self.report.is_none() {
            return Err("--format json requires --report <FILE>".to_string());
        }

        if self.interactive {
            if self.quiet {
                return Err("Cannot use --interactive with --quiet".to_string());
            }
            if self.report.is_some() {
                return Err("Cannot use --interactive with --report".to_string());
            }
            if self.no_export {
                return Err(
                    "Cannot use --interactive with --no-export (the prompt only exports on 'export')"
                        .to_string(),
                );
            }
            if self.fail_on_alert {
                return Err("Cannot use --interactive with --fail-on-alert".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            data: None,
            carrier: None,
            threshold: None,
            output_dir: None,
            no_export: false,
            report: None,
            format: OutputFormat::Markdown,
            show_records: false,
            interactive: false,
            fail_on_alert: false,
            config: None,
            init_config: false,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_parse_carrier_list() {
        let args = Args::parse_from(["shipinsight", "--carrier", "Maersk,CMA CGM", "-t", "7"]);
        assert_eq!(
            args.carrier,
            Some(vec!["Maersk".to_string(), "CMA CGM".to_string()])
        );
        assert_eq!(args.threshold, Some(7));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["shipinsight"]);
        assert!(args.data.is_none());
        assert!(args.carrier.is_none());
        assert_eq!(args.format, OutputFormat::Markdown);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_negative_threshold() {
        let mut args = make_args();
        args.threshold = Some(-1);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_json_needs_report() {
        let mut args = make_args();
        args.format = OutputFormat::Json;
        assert!(args.validate().is_err());

        args.report = Some(PathBuf::from("out.json"));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_interactive_rejects_batch_flags() {
        let mut args = make_args();
        args.interactive = true;
        assert!(args.validate().is_ok());

        args.report = Some(PathBuf::from("out.md"));
        assert!(args.validate().is_err());
        args.report = None;

        args.no_export = true;
        assert!(args.validate().is_err());
        args.no_export = false;

        args.fail_on_alert = true;
        assert!(args.validate().is_err());
        args.fail_on_alert = false;

        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
