use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use grading_client::error::GradingError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Datastore(#[from] datastore::DbError),
    #[error("Filter error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
    #[error("Report error: {0}")]
    Report(#[from] reporting::ReportError),
    #[error("Grading error: {0}")]
    Grading(#[from] GradingError),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// This is the single place a failure becomes user-visible: every error is
/// classified into a status code and a message here, and nothing propagates
/// to the client as a raw, unclassified error.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Datastore(db_err) => {
                tracing::error!(error = ?db_err, "Datastore error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not read the results database".to_string(),
                )
            }
            AppError::Analytics(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            AppError::Report(report_err) => {
                tracing::error!(error = ?report_err, "Report pipeline error.");
                match report_err {
                    reporting::ReportError::Analytics(err) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
                    }
                    other => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        other.to_string(),
                    ),
                }
            }
            AppError::Grading(grading_err) => grading_response(grading_err),
            AppError::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// Maps each grading failure category onto its own status and guidance; the
/// caller decides whether to resubmit, so none of these trigger a retry.
fn grading_response(err: GradingError) -> (StatusCode, String) {
    match &err {
        GradingError::InvalidAnswerKey(_) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        GradingError::Timeout => {
            tracing::warn!("Grading request timed out.");
            (
                StatusCode::GATEWAY_TIMEOUT,
                "The grading service took too long to respond; try submitting again".to_string(),
            )
        }
        GradingError::Connection(_) => {
            tracing::warn!(error = %err, "Grading service unreachable.");
            (
                StatusCode::BAD_GATEWAY,
                "Could not connect to the grading service; check that it is running".to_string(),
            )
        }
        GradingError::Rejected { .. }
        | GradingError::Transport(_)
        | GradingError::Deserialization(_)
        | GradingError::UnrecognizedShape(_) => {
            tracing::error!(error = %err, "Grading request failed.");
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}
