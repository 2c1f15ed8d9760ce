//! Dataset loading and cleaning.
//!
//! Reads the shipment CSV, parses the arrival timestamps, derives
//! `Delay_Days` and substitutes the `Unknown` sentinel for missing
//! categorical values. Any malformed row fails the whole load.

pub mod cache;

pub use cache::load_cached;

use crate::error::LoadError;
use crate::models::{ShipmentRecord, UNKNOWN};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, info};

pub const CONTAINER_ID: &str = "ContainerID";
pub const CARRIER: &str = "Carrier";
pub const ORIGIN_PORT: &str = "Origin_Port";
pub const DESTINATION_PORT: &str = "Destination_Port";
pub const SCHEDULED_ARRIVAL: &str = "Scheduled_Arrival";
pub const ACTUAL_ARRIVAL: &str = "Actual_Arrival";

/// Cell values treated as missing in categorical columns.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    container_id: usize,
    carrier: usize,
    origin_port: usize,
    destination_port: usize,
    scheduled_arrival: usize,
    actual_arrival: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            container_id: find(CONTAINER_ID)?,
            carrier: find(CARRIER)?,
            origin_port: find(ORIGIN_PORT)?,
            destination_port: find(DESTINATION_PORT)?,
            scheduled_arrival: find(SCHEDULED_ARRIVAL)?,
            actual_arrival: find(ACTUAL_ARRIVAL)?,
        })
    }
}

/// Load and clean the dataset at `path`.
pub fn load_shipments(path: &Path) -> Result<Vec<ShipmentRecord>, LoadError> {
    info!("Loading shipments from {}", path.display());

    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let records = read_shipments(file)?;
    info!("Loaded {} shipment records", records.len());

    Ok(records)
}

/// Parse and clean shipment rows from any CSV source.
pub fn read_shipments<R: Read>(source: R) -> Result<Vec<ShipmentRecord>, LoadError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(source);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;
    debug!("Resolved columns: {:?}", columns);

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        records.push(clean_row(&row, i + 1, &columns)?);
    }

    Ok(records)
}

fn clean_row(
    row: &StringRecord,
    row_number: usize,
    columns: &ColumnIndex,
) -> Result<ShipmentRecord, LoadError> {
    let field = |index: usize| row.get(index).unwrap_or("");

    let scheduled = parse_column(field(columns.scheduled_arrival), row_number, SCHEDULED_ARRIVAL)?;
    let actual = parse_column(field(columns.actual_arrival), row_number, ACTUAL_ARRIVAL)?;

    Ok(ShipmentRecord::new(
        field(columns.container_id).trim(),
        clean_category(field(columns.carrier)),
        clean_category(field(columns.origin_port)),
        clean_category(field(columns.destination_port)),
        scheduled,
        actual,
    ))
}

fn parse_column(
    raw: &str,
    row: usize,
    column: &'static str,
) -> Result<NaiveDateTime, LoadError> {
    if raw.trim().is_empty() {
        return Err(LoadError::MissingTimestamp { row, column });
    }

    parse_timestamp(raw).ok_or_else(|| LoadError::Parse {
        row,
        column,
        value: raw.to_string(),
    })
}

/// Parse a date or date-time cell. Offsets are converted to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Normalize a categorical cell, substituting the sentinel for missing values.
pub fn clean_category(raw: &str) -> String {
    let value = raw.trim();
    if MISSING_TOKENS.contains(&value) {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}
