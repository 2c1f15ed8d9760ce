//! Interactive dashboard prompt.
//!
//! Every command that changes the selection re-runs the whole pipeline.
//! Records come from the dataset cache, so reruns only re-read the file
//! when it changed on disk.

use crate::analysis::{analyze, distinct_carriers, CarrierSelection};
use crate::config::Config;
use crate::loader::load_cached;
use crate::models::{DashboardMetadata, ShipmentRecord};
use crate::report::{render_dashboard, ExportArtifact, RenderOptions};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::{debug, info};

const HELP: &str = "\
Commands:
  carriers          list carriers in the dataset
  select <A,B,..>   restrict the dashboard to these carriers
  all               select every carrier
  none              clear the selection
  show              redraw the dashboard
  export            write the high-risk CSV
  help              show this help
  quit              leave the prompt
";

/// A parsed prompt command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Carriers,
    Select(Vec<String>),
    All,
    Deselect,
    Show,
    Export,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "carriers" | "ls" => Command::Carriers,
            "select" | "sel" => {
                if rest.is_empty() {
                    return Err("select needs a comma-separated list of carriers".to_string());
                }
                Command::Select(rest.split(',').map(|c| c.trim().to_string()).collect())
            }
            "all" => Command::All,
            "none" => Command::Deselect,
            "show" => Command::Show,
            "export" => Command::Export,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
        };

        Ok(Some(command))
    }
}

/// Prompt state carried between commands.
pub struct Session<'c> {
    config: &'c Config,
    /// `None` follows every carrier in the current data.
    selection: Option<CarrierSelection>,
}

impl<'c> Session<'c> {
    pub fn new(config: &'c Config, initial: Option<Vec<String>>) -> Self {
        Self {
            config,
            selection: initial.map(CarrierSelection::only),
        }
    }

    /// Read commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        writeln!(out, "{}", HELP)?;
        self.render(&mut out)?;

        for line in input.lines() {
            let line = line.context("Failed to read from prompt")?;
            match Command::parse(&line) {
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.execute(command, &mut out)?,
                Ok(None) => {}
                Err(message) => writeln!(out, "{}", message)?,
            }
            out.flush()?;
        }

        info!("Interactive session ended");
        Ok(())
    }

    fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<()> {
        debug!("Prompt command: {:?}", command);

        match command {
            Command::Carriers => {
                let records = load_cached(&self.config.data.path)?;
                for carrier in distinct_carriers(&records) {
                    writeln!(out, "  {}", carrier)?;
                }
            }
            Command::Select(carriers) => {
                self.selection = Some(CarrierSelection::only(carriers));
                self.render(out)?;
            }
            Command::All => {
                self.selection = None;
                self.render(out)?;
            }
            Command::Deselect => {
                self.selection = Some(CarrierSelection::none());
                self.render(out)?;
            }
            Command::Show => self.render(out)?,
            Command::Export => {
                let path = self.export()?;
                writeln!(out, "✅ Exported to {}", path.display())?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => {}
        }

        Ok(())
    }

    fn carrier_selection(&self, records: &[ShipmentRecord]) -> CarrierSelection {
        match &self.selection {
            Some(selection) => selection.clone(),
            None => CarrierSelection::all(records),
        }
    }

    fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        let records = load_cached(&self.config.data.path)?;
        let selection = self.carrier_selection(&records);
        let threshold = self.config.risk.threshold_days;

        let insights = analyze(&records, &selection, threshold);
        let metadata = DashboardMetadata::new(
            &self.config.data.path,
            records.len(),
            selection.carriers(),
            threshold,
        );
        let options = RenderOptions {
            bar_width: self.config.report.bar_width,
            show_records: self.config.report.show_records,
        };

        write!(out, "{}", render_dashboard(&metadata, &insights, &options))?;
        Ok(())
    }

    fn export(&self) -> Result<std::path::PathBuf> {
        let records = load_cached(&self.config.data.path)?;
        let selection = self.carrier_selection(&records);
        let insights = analyze(&records, &selection, self.config.risk.threshold_days);

        let artifact =
            ExportArtifact::from_records(&insights.risk.high_risk, &self.config.report.export_file)?;
        Ok(artifact.write_to(&self.config.report.output_dir)?)
    }
}
