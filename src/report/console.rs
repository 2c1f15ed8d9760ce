//! Terminal rendering of the dashboard panels.

use crate::analysis::Insights;
use crate::models::{CarrierDelay, DashboardMetadata, DelayMetrics, PortDelayStats, ShipmentRecord};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};

/// Options for the terminal dashboard.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Width of the longest carrier bar, in characters.
    pub bar_width: usize,
    /// Show every filtered record below the charts.
    pub show_records: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            bar_width: 40,
            show_records: false,
        }
    }
}

/// Render every panel of the dashboard as one string.
pub fn render_dashboard(
    metadata: &DashboardMetadata,
    insights: &Insights<'_>,
    options: &RenderOptions,
) -> String {
    let mut out = String::new();

    out.push_str("🚢 Logistics & Shipping Container Data Analysis\n\n");
    out.push_str(&render_selection(metadata));
    out.push_str(&render_metrics(&insights.metrics));
    out.push('\n');

    out.push_str("🚨 High-Risk Shipment Alert\n");
    out.push_str(&render_banner(insights));
    if !insights.risk.high_risk.is_empty() {
        out.push_str(&render_high_risk(&insights.risk.high_risk));
        out.push('\n');
    }
    out.push('\n');

    out.push_str("📊 Performance by Carrier (Avg Delay per Carrier)\n");
    out.push_str(&render_carrier_bars(&insights.carrier_delays, options.bar_width));
    out.push('\n');

    out.push_str("⚓ Port Congestion Analysis (Delay Spread per Port)\n");
    out.push_str(&render_port_boxes(&insights.port_delays));
    out.push('\n');

    if options.show_records {
        out.push_str("📋 Full Shipment Logs\n");
        out.push_str(&render_records(&insights.filtered));
        out.push('\n');
    }

    out
}

fn render_selection(metadata: &DashboardMetadata) -> String {
    let carriers = if metadata.selected_carriers.is_empty() {
        "(none)".to_string()
    } else {
        metadata.selected_carriers.join(", ")
    };
    format!(
        "Dataset: {} ({} records)\nCarriers: {}\n\n",
        metadata.dataset, metadata.total_records, carriers
    )
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// The three-value metrics strip.
pub fn render_metrics(metrics: &DelayMetrics) -> String {
    let mut table = new_table();
    table.set_header(vec!["Total Containers", "Avg Delay (Days)", "Max Delay Found"]);
    table.add_row(vec![
        Cell::new(metrics.count).set_alignment(CellAlignment::Center),
        Cell::new(metrics.avg_display()).set_alignment(CellAlignment::Center),
        Cell::new(metrics.max_display()).set_alignment(CellAlignment::Center),
    ]);
    format!("{}\n", table)
}

fn render_banner(insights: &Insights<'_>) -> String {
    if insights.risk.status.is_alert() {
        format!("❌ {}\n", insights.risk.banner())
    } else {
        format!("✅ {}\n", insights.risk.banner())
    }
}

fn render_high_risk(records: &[&ShipmentRecord]) -> String {
    let mut table = new_table();
    table.set_header(vec!["ContainerID", "Carrier", "Destination_Port", "Delay_Days"]);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.container_id),
            Cell::new(&record.carrier),
            Cell::new(&record.destination_port),
            Cell::new(record.delay_days)
                .fg(Color::Red)
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table.to_string()
}

/// One horizontal bar per carrier, scaled to the largest absolute mean.
pub fn render_carrier_bars(carriers: &[CarrierDelay], bar_width: usize) -> String {
    if carriers.is_empty() {
        return "  (no shipments selected)\n".to_string();
    }

    let label_width = carriers
        .iter()
        .map(|c| c.carrier.chars().count())
        .max()
        .unwrap_or(0);
    let scale = carriers
        .iter()
        .map(|c| c.mean_delay.abs())
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    for carrier in carriers {
        let length = if scale > 0.0 {
            ((carrier.mean_delay.abs() / scale) * bar_width as f64).round() as usize
        } else {
            0
        };
        let glyph = if carrier.mean_delay < 0.0 { "░" } else { "█" };
        out.push_str(&format!(
            "  {:<width$} │{} {:.2}\n",
            carrier.carrier,
            glyph.repeat(length),
            carrier.mean_delay,
            width = label_width
        ));
    }
    out
}

/// Box statistics per destination port.
pub fn render_port_boxes(ports: &[PortDelayStats]) -> String {
    if ports.is_empty() {
        return "  (no shipments selected)\n".to_string();
    }

    let mut table = new_table();
    table.set_header(vec![
        "Destination_Port",
        "n",
        "Min",
        "Q1",
        "Median",
        "Q3",
        "Max",
        "Whiskers",
        "Outliers",
    ]);
    for port in ports {
        let outliers = port
            .outliers
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&port.destination_port),
            Cell::new(port.delays.len()),
            Cell::new(port.min),
            Cell::new(port.q1),
            Cell::new(port.median),
            Cell::new(port.q3),
            Cell::new(port.max),
            Cell::new(format!("{} .. {}", port.lower_whisker, port.upper_whisker)),
            Cell::new(outliers),
        ]);
    }
    format!("{}\n", table)
}

fn render_records(records: &[&ShipmentRecord]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "ContainerID",
        "Carrier",
        "Origin_Port",
        "Destination_Port",
        "Scheduled_Arrival",
        "Actual_Arrival",
        "Delay_Days",
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(&record.container_id),
            Cell::new(&record.carrier),
            Cell::new(&record.origin_port),
            Cell::new(&record.destination_port),
            Cell::new(record.scheduled_arrival.format("%Y-%m-%d %H:%M")),
            Cell::new(record.actual_arrival.format("%Y-%m-%d %H:%M")),
            Cell::new(record.delay_days).set_alignment(CellAlignment::Right),
        ]);
    }
    format!("{}\n", table)
}
