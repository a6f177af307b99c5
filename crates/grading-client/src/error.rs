use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradingError {
    #[error("The answer key is not a valid JSON object of expected answers: {0}")]
    InvalidAnswerKey(String),

    #[error("The grading service did not respond within the configured timeout")]
    Timeout,

    #[error("Could not connect to the grading service: {0}")]
    Connection(String),

    #[error("The grading request failed in transit: {0}")]
    Transport(String),

    #[error("The grading service rejected the request with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Failed to deserialize the grading response: {0}")]
    Deserialization(String),

    #[error("The grading response has an unrecognized structure: {0}")]
    UnrecognizedShape(String),
}
