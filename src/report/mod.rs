//! Dashboard output: terminal panels, report files and the CSV export.

pub mod console;
pub mod export;
pub mod generator;

pub use console::{render_dashboard, RenderOptions};
pub use export::{ExportArtifact, EXPORT_FILE_NAME};
pub use generator::{generate_json_report, generate_markdown_report};
