//! # Examiner Export Composer
//!
//! Serializes a filtered record set, together with its precomputed
//! statistics and chart, into the three downloadable artifacts: delimited
//! text, a spreadsheet workbook, and a paginated PDF report.
//!
//! ## Architectural Principles
//!
//! - **Independent Writers:** Each format is produced by its own function
//!   from the same immutable inputs; none of them re-filters or caches, so
//!   an export always reflects exactly the sequence it was handed.
//! - **In-Memory Artifacts:** Writers return complete byte buffers plus
//!   filename and MIME type; persisting or transmitting them is the
//!   caller's concern.
//! - **Reproducible Bytes:** All three writers are deterministic for a
//!   given input (the workbook pins its creation timestamp; the PDF carries
//!   none).
//!
//! ## Public API
//!
//! - `render_csv`, `render_workbook`, `render_document`: The three format
//!   writers.
//! - `ExportFormat` / `ExportArtifact`: Format selection and the finished
//!   artifact envelope.
//! - `ExportError`: The specific error types that can be returned from this
//!   crate.

use std::fmt;
use std::str::FromStr;

// Declare the modules that constitute this crate.
pub mod csv;
pub mod document;
pub mod error;
pub mod spreadsheet;

// Re-export the key components to create a clean, public-facing API.
pub use csv::render_csv;
pub use document::render_document;
pub use error::ExportError;
pub use spreadsheet::render_workbook;

/// Timestamp rendering shared by every export surface.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The export formats offered to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn filename(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "resultados.csv",
            ExportFormat::Xlsx => "resultados.xlsx",
            ExportFormat::Pdf => "reporte.pdf",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        })
    }
}

/// One finished export: the complete file content plus the metadata a
/// download response or a file writer needs.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub filename: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn new(format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            filename: format.filename(),
            mime: format.mime(),
            bytes,
        }
    }
}
