//! Markdown and JSON report generation.
//!
//! This module renders a complete dashboard snapshot to a file-friendly
//! format, mirroring the panels shown in the terminal.

use crate::analysis::{most_congested_ports, Insights};
use crate::models::{CarrierDelay, DashboardMetadata, DelayMetrics, PortDelayStats, ShipmentRecord};
use anyhow::Result;
use serde::Serialize;

/// JSON shape of a dashboard snapshot.
#[derive(Debug, Serialize)]
struct DashboardReport<'r, 'a> {
    metadata: &'r DashboardMetadata,
    #[serde(flatten)]
    insights: &'r Insights<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<&'r [&'a ShipmentRecord]>,
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(
    metadata: &DashboardMetadata,
    insights: &Insights<'_>,
    include_records: bool,
) -> String {
    let mut output = String::new();

    output.push_str("# Logistics & Shipping Container Data Analysis\n\n");
    output.push_str(&generate_metadata_section(metadata));
    output.push_str(&generate_metrics_section(&insights.metrics));
    output.push_str(&generate_risk_section(insights));
    output.push_str(&generate_carrier_section(&insights.carrier_delays));
    output.push_str(&generate_port_section(&insights.port_delays));

    if include_records {
        output.push_str(&generate_records_section(&insights.filtered));
    }

    output.push_str(&generate_footer());

    output
}

fn generate_metadata_section(metadata: &DashboardMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.dataset));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Records Loaded:** {}\n",
        metadata.total_records
    ));
    if metadata.selected_carriers.is_empty() {
        section.push_str("- **Carriers:** _none selected_\n");
    } else {
        section.push_str(&format!(
            "- **Carriers:** {}\n",
            metadata.selected_carriers.join(", ")
        ));
    }
    section.push_str(&format!(
        "- **Risk Threshold:** {} days\n\n",
        metadata.threshold_days
    ));

    section
}

fn generate_metrics_section(metrics: &DelayMetrics) -> String {
    let mut section = String::new();

    section.push_str("## Key Metrics\n\n");
    section.push_str("| Total Containers | Avg Delay (Days) | Max Delay Found |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        metrics.count,
        metrics.avg_display(),
        metrics.max_display()
    ));

    section
}

fn generate_risk_section(insights: &Insights<'_>) -> String {
    let mut section = String::new();
    let risk = &insights.risk;

    section.push_str("## High-Risk Shipment Alert\n\n");

    if !risk.status.is_alert() {
        section.push_str(&format!("> ✅ {}\n\n", risk.banner()));
        return section;
    }

    section.push_str(&format!("> 🚨 **{}**\n\n", risk.banner()));
    section.push_str("| ContainerID | Carrier | Destination_Port | Delay_Days |\n");
    section.push_str("|:---|:---|:---|---:|\n");
    for record in &risk.high_risk {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(&record.container_id),
            escape_cell(&record.carrier),
            escape_cell(&record.destination_port),
            record.delay_days
        ));
    }
    section.push('\n');

    section
}

fn generate_carrier_section(carriers: &[CarrierDelay]) -> String {
    let mut section = String::new();

    section.push_str("## Performance by Carrier\n\n");

    if carriers.is_empty() {
        section.push_str("No shipments in the current selection.\n\n");
        return section;
    }

    section.push_str("| Carrier | Shipments | Avg Delay (Days) |\n");
    section.push_str("|:---|:---:|---:|\n");
    for carrier in carriers {
        section.push_str(&format!(
            "| {} | {} | {:.2} |\n",
            escape_cell(&carrier.carrier),
            carrier.shipments,
            carrier.mean_delay
        ));
    }
    section.push('\n');

    section
}

fn generate_port_section(ports: &[PortDelayStats]) -> String {
    let mut section = String::new();

    section.push_str("## Port Congestion Analysis\n\n");

    if ports.is_empty() {
        section.push_str("No shipments in the current selection.\n\n");
        return section;
    }

    section.push_str("| Destination_Port | n | Min | Q1 | Median | Q3 | Max | Outliers |\n");
    section.push_str("|:---|:---:|---:|---:|---:|---:|---:|:---|\n");
    for port in ports {
        let outliers = if port.outliers.is_empty() {
            "-".to_string()
        } else {
            port.outliers
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            escape_cell(&port.destination_port),
            port.delays.len(),
            port.min,
            port.q1,
            port.median,
            port.q3,
            port.max,
            outliers
        ));
    }
    section.push('\n');

    let congested = most_congested_ports(ports, 3);
    section.push_str("### Most Congested Ports\n\n");
    for (i, port) in congested.iter().enumerate() {
        section.push_str(&format!(
            "{}. {} (median {} days)\n",
            i + 1,
            port.destination_port,
            port.median
        ));
    }
    section.push('\n');

    section
}

fn generate_records_section(records: &[&ShipmentRecord]) -> String {
    let mut section = String::new();

    section.push_str("## Shipment Logs\n\n");
    section.push_str(
        "| ContainerID | Carrier | Origin_Port | Destination_Port | Scheduled_Arrival | Actual_Arrival | Delay_Days |\n",
    );
    section.push_str("|:---|:---|:---|:---|:---|:---|---:|\n");
    for record in records {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            escape_cell(&record.container_id),
            escape_cell(&record.carrier),
            escape_cell(&record.origin_port),
            escape_cell(&record.destination_port),
            record.scheduled_arrival.format("%Y-%m-%d %H:%M"),
            record.actual_arrival.format("%Y-%m-%d %H:%M"),
            record.delay_days
        ));
    }
    section.push('\n');

    section
}

fn generate_footer() -> String {
    "---\n\n*Report generated by ShipInsight*\n".to_string()
}

/// Pipes would split a Markdown table cell.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Generate a JSON report.
pub fn generate_json_report(
    metadata: &DashboardMetadata,
    insights: &Insights<'_>,
    include_records: bool,
) -> Result<String> {
    let report = DashboardReport {
        metadata,
        insights,
        records: include_records.then_some(insights.filtered.as_slice()),
    };
    serde_json::to_string_pretty(&report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::sample_records;
    use crate::analysis::{analyze, CarrierSelection};
    use chrono::Utc;

    fn metadata(selection: &CarrierSelection) -> DashboardMetadata {
        DashboardMetadata {
            dataset: "shipping_containers_1000.csv".to_string(),
            generated_at: Utc::now(),
            total_records: 3,
            selected_carriers: selection.carriers().to_vec(),
            threshold_days: 10,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let records = sample_records();
        let selection = CarrierSelection::all(&records);
        let insights = analyze(&records, &selection, 10);

        let markdown = generate_markdown_report(&metadata(&selection), &insights, false);

        assert!(markdown.contains("# Logistics & Shipping Container Data Analysis"));
        assert!(markdown.contains("## Key Metrics"));
        assert!(markdown.contains("| 3 | 10.00 | 15 Days |"));
        assert!(markdown.contains(
            "ATTENTION: 2 shipments have exceeded the 10-day delay threshold!"
        ));
        assert!(markdown.contains("| A | X | Rotterdam | 15 |"));
        assert!(markdown.contains("## Performance by Carrier"));
        assert!(markdown.contains("## Port Congestion Analysis"));
        assert!(!markdown.contains("## Shipment Logs"));
    }

    #[test]
    fn test_markdown_empty_selection() {
        let records = sample_records();
        let selection = CarrierSelection::none();
        let insights = analyze(&records, &selection, 10);

        let markdown = generate_markdown_report(&metadata(&selection), &insights, true);

        assert!(markdown.contains("_none selected_"));
        assert!(markdown.contains("| 0 | N/A | N/A |"));
        assert!(markdown.contains("All shipments are within acceptable delay limits."));
        assert!(!markdown.contains("NaN"));
    }

    #[test]
    fn test_markdown_includes_records_when_asked() {
        let records = sample_records();
        let selection = CarrierSelection::only(["Y"]);
        let insights = analyze(&records, &selection, 10);

        let markdown = generate_markdown_report(&metadata(&selection), &insights, true);
        assert!(markdown.contains("## Shipment Logs"));
        assert!(markdown.contains("| C | Y | Shanghai | Rotterdam |"));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
    }

    #[test]
    fn test_generate_json_report() {
        let records = sample_records();
        let selection = CarrierSelection::all(&records);
        let insights = analyze(&records, &selection, 10);

        let json = generate_json_report(&metadata(&selection), &insights, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metrics"]["count"], 3);
        assert_eq!(value["metrics"]["max_delay"], 15);
        assert_eq!(value["risk"]["status"]["status"], "alert");
        assert_eq!(value["risk"]["high_risk"][0]["ContainerID"], "A");
        assert_eq!(value["carrier_delays"][0]["carrier"], "X");
        assert!(value.get("records").is_none());
    }

    #[test]
    fn test_json_report_with_records() {
        let records = sample_records();
        let selection = CarrierSelection::only(["X"]);
        let insights = analyze(&records, &selection, 10);

        let json = generate_json_report(&metadata(&selection), &insights, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["records"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(value["metadata"]["selected_carriers"][0], "X");
    }
}
