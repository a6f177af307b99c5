use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Filter or statistics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Chart rendering error: {0}")]
    Chart(#[from] charting::ChartError),

    #[error("Export error: {0}")]
    Export(#[from] exporter::ExportError),
}
