//! # Examiner Grading Client
//!
//! The adapter for the external grading service: a single blocking-style
//! request/response call that submits an answer-sheet photograph and returns
//! the normalized per-question evaluation.
//!
//! ## Architectural Principles
//!
//! - **Explicit Failure Categories:** Timeout, connection failure, non-200
//!   status and malformed payloads are distinct errors; the boundary decides
//!   how each is presented. There is no retry here; whether to resubmit is
//!   the caller's decision.
//! - **Validate Before Sending:** The answer key is parsed locally; a
//!   malformed key never produces a request.
//! - **Normalize at the Edge:** Both known response shapes are collapsed to
//!   one flat report before anything downstream sees them.

use crate::error::GradingError;
use crate::responses::GradingReport;
use async_trait::async_trait;
use configuration::GradingSettings;
use std::time::Duration;

pub mod error;
pub mod request;
pub mod responses;

// --- Public API ---
pub use request::{AnswerKey, GradingSubmission};
pub use responses::{classify, normalize, AnswerReview, ResponseShape};

/// The abstract interface to a grading service. The boundary codes against
/// this trait, allowing the webhook implementation to be swapped out for a
/// mock in tests.
#[async_trait]
pub trait GradingClient: Send + Sync {
    /// Submits one answer sheet for evaluation and returns the normalized
    /// report.
    async fn grade(&self, submission: &GradingSubmission) -> Result<GradingReport, GradingError>;
}

/// The concrete client for the grading webhook.
#[derive(Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    webhook_url: String,
}

impl WebhookClient {
    pub fn new(settings: &GradingSettings) -> Result<Self, GradingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| GradingError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            webhook_url: settings.webhook_url.clone(),
        })
    }
}

#[async_trait]
impl GradingClient for WebhookClient {
    async fn grade(&self, submission: &GradingSubmission) -> Result<GradingReport, GradingError> {
        tracing::info!(
            student_id = %submission.student_id,
            exam_id = %submission.exam_id,
            "Submitting answer sheet to the grading service."
        );

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&submission.payload())
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            return Err(GradingError::Rejected {
                status: status.as_u16(),
                detail: text,
            });
        }

        let body: serde_json::Value = serde_json::from_str(&text)
            .map_err(|err| GradingError::Deserialization(err.to_string()))?;
        responses::normalize(body)
    }
}

/// Splits a transport failure into the categories the boundary reports
/// differently: a timeout, a refused/unreachable host, or anything else.
fn classify_transport_error(err: reqwest::Error) -> GradingError {
    if err.is_timeout() {
        GradingError::Timeout
    } else if err.is_connect() {
        GradingError::Connection(err.to_string())
    } else {
        GradingError::Transport(err.to_string())
    }
}
