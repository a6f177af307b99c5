//! # Examiner Reporting Pipeline
//!
//! The single entry point that turns a loaded record set plus a filter into
//! everything the presentation layer shows or serves: the filtered
//! subsequence, its descriptive statistics, the rendered chart, and the
//! three export artifacts.
//!
//! ## Architectural Principles
//!
//! - **One Snapshot:** The filtered sequence is computed once and the same
//!   immutable value is threaded through statistics, charting and every
//!   export. Nothing downstream re-queries or re-filters, so the artifacts
//!   can never disagree with each other.
//! - **Pure Function:** `build_report` does no I/O. Loading records is the
//!   caller's job; this keeps the whole pipeline unit-testable without a
//!   database or HTTP harness.
//! - **Explicit Empty State:** Zero matches is a first-class outcome, not an
//!   error. The statistics engine and the renderers are only invoked once
//!   the set is known to be non-empty.

use analytics::{apply_filters, ScoreSummary, StatisticsEngine};
use charting::{render_overview, ChartImage};
use core_types::{ExamResultRecord, FilterCriteria};
use exporter::{
    render_csv, render_document, render_workbook, ExportArtifact, ExportFormat,
};

pub mod error;

pub use error::ReportError;

/// The three export artifacts produced from one filtered snapshot.
#[derive(Debug, Clone)]
pub struct ReportExports {
    pub csv: ExportArtifact,
    pub workbook: ExportArtifact,
    pub document: ExportArtifact,
}

impl ReportExports {
    pub fn artifact(&self, format: ExportFormat) -> &ExportArtifact {
        match format {
            ExportFormat::Csv => &self.csv,
            ExportFormat::Xlsx => &self.workbook,
            ExportFormat::Pdf => &self.document,
        }
    }

    pub fn into_artifact(self, format: ExportFormat) -> ExportArtifact {
        match format {
            ExportFormat::Csv => self.csv,
            ExportFormat::Xlsx => self.workbook,
            ExportFormat::Pdf => self.document,
        }
    }
}

/// Everything derived from one filter application.
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub filtered: Vec<ExamResultRecord>,
    pub summary: ScoreSummary,
    pub chart: ChartImage,
    pub exports: ReportExports,
}

/// The outcome of running the pipeline: either a full bundle, or the
/// informational "no matches" state the caller must present as such.
#[derive(Debug)]
pub enum ReportOutcome {
    NoMatches,
    Report(Box<ReportBundle>),
}

/// Runs the full pipeline: filter, statistics, chart, exports.
///
/// Invoked once per filter change; every derived value is recomputed from
/// scratch so repeated calls with different criteria can never serve stale
/// artifacts.
pub fn build_report(
    records: &[ExamResultRecord],
    criteria: &FilterCriteria,
) -> Result<ReportOutcome, ReportError> {
    let filtered = apply_filters(records, criteria)?;
    if filtered.is_empty() {
        tracing::debug!("Filter matched no records; skipping statistics and rendering.");
        return Ok(ReportOutcome::NoMatches);
    }

    let summary = StatisticsEngine::new().compute(&filtered)?;
    let chart = render_overview(&filtered)?;

    let csv = ExportArtifact::new(ExportFormat::Csv, render_csv(&filtered).into_bytes());
    let workbook = ExportArtifact::new(ExportFormat::Xlsx, render_workbook(&filtered)?);
    let document = ExportArtifact::new(
        ExportFormat::Pdf,
        render_document(&filtered, &summary, &chart)?,
    );

    tracing::debug!(
        matches = filtered.len(),
        "Report pipeline produced statistics, chart and exports."
    );

    Ok(ReportOutcome::Report(Box::new(ReportBundle {
        filtered,
        summary,
        chart,
        exports: ReportExports {
            csv,
            workbook,
            document,
        },
    })))
}
