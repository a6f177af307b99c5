use crate::error::GradingError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::collections::BTreeMap;

/// The expected answers for an exam: question number to expected answer
/// letter. Parsed and validated *before* any grading request is issued, so a
/// malformed key never reaches the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKey(BTreeMap<String, String>);

impl AnswerKey {
    pub fn parse(raw: &str) -> Result<Self, GradingError> {
        let map: BTreeMap<String, String> = serde_json::from_str(raw)
            .map_err(|err| GradingError::InvalidAnswerKey(err.to_string()))?;
        Ok(Self(map))
    }

    /// Canonical JSON form sent to the grading service.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One answer-sheet photograph queued for grading, together with the
/// identifiers the grading service echoes back into the datastore.
#[derive(Debug, Clone)]
pub struct GradingSubmission {
    pub student_id: String,
    pub exam_id: String,
    /// Raw image bytes as captured; encoded to base64 only at the wire.
    pub image: Vec<u8>,
    pub answer_key: AnswerKey,
    pub timestamp: DateTime<Utc>,
}

impl GradingSubmission {
    /// The JSON body the webhook expects: the image as plain base64 with no
    /// data-URI prefix, and the answer key as a JSON string.
    pub fn payload(&self) -> serde_json::Value {
        json!({
            "student_id": self.student_id,
            "exam_id": self.exam_id,
            "exam_image": STANDARD.encode(&self.image),
            "answer_key": self.answer_key.to_json_string(),
            "timestamp": self.timestamp.to_rfc3339(),
        })
    }
}
