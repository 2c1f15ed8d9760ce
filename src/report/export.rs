//! High-risk CSV export.
//!
//! The export carries the four columns an operator needs to chase a late
//! container. It is always written, header-only when nothing is at risk.

use crate::error::ExportError;
use crate::models::ShipmentRecord;
use csv::{Terminator, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name offered for the export.
pub const EXPORT_FILE_NAME: &str = "high_risk_alerts.csv";

/// MIME type of the export.
pub const EXPORT_MIME: &str = "text/csv";

/// Column order of the export.
pub const EXPORT_COLUMNS: [&str; 4] = ["ContainerID", "Carrier", "Destination_Port", "Delay_Days"];

/// A serialized export, ready to be saved or served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Serialize `records` (already in display order) into an artifact.
    pub fn from_records(
        records: &[&ShipmentRecord],
        file_name: impl Into<String>,
    ) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: file_name.into(),
            mime: EXPORT_MIME,
            bytes: export_high_risk(records)?,
        })
    }

    /// Write the artifact into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        info!("Exported {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

/// Serialize records as UTF-8 CSV with a header row and no index column.
pub fn export_high_risk(records: &[&ShipmentRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_COLUMNS)?;
    for record in records {
        writer.write_record([
            record.container_id.as_str(),
            record.carrier.as_str(),
            record.destination_port.as_str(),
            record.delay_days.to_string().as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{record, sample_records};
    use crate::analysis::{analyze, CarrierSelection};
    use crate::loader::read_shipments;
    use crate::models::DashboardMetadata;
    use crate::report::generate_markdown_report;
    use csv::ReaderBuilder;
    use std::path::Path;

    fn parse(bytes: &[u8]) -> Vec<(String, String, String, i64)> {
        let mut reader = ReaderBuilder::new().from_reader(bytes);
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), EXPORT_COLUMNS.to_vec());

        reader
            .records()
            .map(|row| {
                let row = row.unwrap();
                (
                    row[0].to_string(),
                    row[1].to_string(),
                    row[2].to_string(),
                    row[3].parse().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_export_round_trips_in_order() {
        let records = sample_records();
        let insights = analyze(&records, &CarrierSelection::all(&records), 10);

        let bytes = export_high_risk(&insights.risk.high_risk).unwrap();
        let rows = parse(&bytes);

        let expected: Vec<(String, String, String, i64)> = insights
            .risk
            .high_risk
            .iter()
            .map(|r| {
                (
                    r.container_id.clone(),
                    r.carrier.clone(),
                    r.destination_port.clone(),
                    r.delay_days,
                )
            })
            .collect();
        assert_eq!(rows, expected);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_export_exact_bytes() {
        let records = sample_records();
        let insights = analyze(&records, &CarrierSelection::all(&records), 10);

        let bytes = export_high_risk(&insights.risk.high_risk).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "ContainerID,Carrier,Destination_Port,Delay_Days\nA,X,Rotterdam,15\nC,Y,Rotterdam,12\n"
        );
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let bytes = export_high_risk(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "ContainerID,Carrier,Destination_Port,Delay_Days\n"
        );
    }

    #[test]
    fn test_export_quotes_commas() {
        let shipment = record("Z-1", "Hapag, Lloyd", "Le Havre", 20);
        let bytes = export_high_risk(&[&shipment]).unwrap();
        let rows = parse(&bytes);
        assert_eq!(rows[0].1, "Hapag, Lloyd");
    }

    #[test]
    fn test_artifact_written_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let records = sample_records();
        let refs: Vec<&ShipmentRecord> = records.iter().collect();

        let artifact = ExportArtifact::from_records(&refs, EXPORT_FILE_NAME).unwrap();
        assert_eq!(artifact.mime, "text/csv");

        let path = artifact.write_to(&dir.path().join("out")).unwrap();
        assert!(path.ends_with("high_risk_alerts.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
    }

    #[test]
    fn test_missing_carrier_exports_as_unknown() {
        let csv = "ContainerID,Carrier,Origin_Port,Destination_Port,Scheduled_Arrival,Actual_Arrival\n\
                   A,,Busan,,2024-01-01,2024-01-20\n\
                   B,X,Busan,Hamburg,2024-01-01,2024-01-02\n";
        let records = read_shipments(csv.as_bytes()).unwrap();
        let selection = CarrierSelection::all(&records);
        let insights = analyze(&records, &selection, 10);

        let bytes = export_high_risk(&insights.risk.high_risk).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "ContainerID,Carrier,Destination_Port,Delay_Days\nA,Unknown,Unknown,19\n"
        );

        let metadata = DashboardMetadata::new(
            Path::new("shipments.csv"),
            records.len(),
            selection.carriers(),
            10,
        );
        let markdown = generate_markdown_report(&metadata, &insights, true);
        assert!(markdown.contains("| A | Unknown | Unknown | 19 |"));
    }
}
