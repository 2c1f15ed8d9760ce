//! Error types for loading and exporting shipment data.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while loading the shipment dataset.
///
/// Any of these aborts the whole run; there is no partial load.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Dataset not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Row {row}: column {column} has an empty timestamp")]
    MissingTimestamp { row: usize, column: &'static str },

    #[error("Row {row}: cannot parse {column} value '{value}' as a date")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Errors raised while serializing the high-risk export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = LoadError::Parse {
            row: 4,
            column: "Actual_Arrival",
            value: "not-a-date".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Row 4: cannot parse Actual_Arrival value 'not-a-date' as a date"
        );
    }

    #[test]
    fn test_file_not_found_message() {
        let err = LoadError::FileNotFound(PathBuf::from("missing.csv"));
        assert_eq!(err.to_string(), "Dataset not found: missing.csv");
    }
}
