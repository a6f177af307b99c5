use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Cannot render charts for an empty record set")]
    EmptyInput,

    #[error("Failed to encode the chart image: {0}")]
    Encode(#[from] png::EncodingError),
}
