use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to build the spreadsheet workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to assemble the PDF document: {0}")]
    Document(#[from] lopdf::Error),

    #[error("Failed to decode the chart image for embedding: {0}")]
    ChartImage(#[from] image::ImageError),

    #[error("Failed to write the document bytes: {0}")]
    Io(#[from] std::io::Error),
}
