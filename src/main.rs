//! ShipInsight - Shipping Container Delay Dashboard
//!
//! A CLI tool that loads a CSV of container arrivals, filters it by
//! carrier, summarizes delays, flags high-risk shipments and exports
//! them for follow-up.
//!
//! Exit codes:
//!   0 - Success (no alert, or no --fail-on-alert set)
//!   1 - Runtime error (missing dataset, bad timestamps, config, I/O)
//!   2 - High-risk shipments found with --fail-on-alert

mod analysis;
mod cli;
mod config;
mod error;
mod interactive;
mod loader;
mod models;
mod report;

use analysis::{analyze, CarrierSelection};
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::DashboardMetadata;
use report::{ExportArtifact, RenderOptions};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("ShipInsight v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_dashboard(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .shipinsight.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the dataset, risk threshold and export location.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the dashboard once (or the prompt). Returns exit code (0 or 2).
fn run_dashboard(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let records = loader::load_cached(&config.data.path)
        .with_context(|| format!("Failed to load {}", config.data.path.display()))?;

    if args.interactive {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        interactive::Session::new(&config, args.carrier.clone())
            .run(stdin.lock(), stdout.lock())?;
        return Ok(0);
    }

    let selection = match args.carrier {
        Some(ref carriers) => CarrierSelection::only(carriers),
        None => CarrierSelection::all(&records),
    };
    warn_unknown_carriers(&records, &selection);

    let threshold = config.risk.threshold_days;
    let insights = analyze(&records, &selection, threshold);
    let metadata = DashboardMetadata::new(
        &config.data.path,
        records.len(),
        selection.carriers(),
        threshold,
    );

    if !args.quiet {
        let options = RenderOptions {
            bar_width: config.report.bar_width,
            show_records: config.report.show_records,
        };
        print!(
            "{}",
            report::render_dashboard(&metadata, &insights, &options)
        );
    }

    if let Some(ref report_path) = args.report {
        let output = match args.format {
            OutputFormat::Json => {
                report::generate_json_report(&metadata, &insights, config.report.show_records)?
            }
            OutputFormat::Markdown => {
                report::generate_markdown_report(&metadata, &insights, config.report.show_records)
            }
        };

        std::fs::write(report_path, &output)
            .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
        info!("Report saved to {}", report_path.display());
    }

    if !args.no_export {
        let artifact =
            ExportArtifact::from_records(&insights.risk.high_risk, &config.report.export_file)
                .context("Failed to serialize high-risk export")?;
        let path = artifact
            .write_to(&config.report.output_dir)
            .context("Failed to write high-risk export")?;
        if !args.quiet {
            println!(
                "📤 High-risk report ({}) saved to: {}",
                artifact.mime,
                path.display()
            );
        }
    }

    if args.fail_on_alert && insights.risk.status.is_alert() {
        eprintln!(
            "\n⛔ {} Failing (exit code 2).",
            insights.risk.banner()
        );
        return Ok(2);
    }

    Ok(0)
}

/// Log carriers that were asked for but never appear in the data.
fn warn_unknown_carriers(records: &[models::ShipmentRecord], selection: &CarrierSelection) {
    let known = analysis::distinct_carriers(records);
    for carrier in selection.carriers() {
        if !known.contains(carrier) {
            warn!("Carrier '{}' does not appear in the dataset", carrier);
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
