use crate::error::GradingError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The normalized, flat grading report shown to the student.
///
/// The wire may deliver this either directly or nested under the evaluator
/// envelope (see [`classify`]); after normalization the presentation layer
/// only ever sees this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingReport {
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub incorrect_count: u32,
    #[serde(default)]
    pub percent_correct: f64,
    #[serde(default)]
    pub answers: Vec<AnswerReview>,
    /// The OCR transcript, useful for debugging a bad grade. The nested
    /// shape may omit it, in which case it defaults to empty.
    #[serde(default)]
    pub raw_ocr_text: String,
}

/// One graded question, as evaluated by the external service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerReview {
    pub question: u32,
    #[serde(rename = "studentValue", default)]
    pub student_value: String,
    #[serde(rename = "correctValue", default)]
    pub correct_value: String,
    #[serde(rename = "isCorrect", default)]
    pub is_correct: bool,
}

/// The two response shapes the grading service is known to produce. The
/// classification is an explicit step: shape detection never proceeds by
/// speculative field access with a fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// The report fields sit at the top level.
    Flat(Value),
    /// The report sits one level deeper, under `evaluador[0].json`; a
    /// top-level `raw_ocr_text` may accompany it.
    Nested { report: Value, raw_ocr_text: String },
}

/// Decides which shape a response body has.
///
/// Presence of a top-level `evaluador` key is the discriminator: it must
/// then hold a non-empty array whose first element carries a `json` field,
/// anything else is an unrecognized structure. A body without that key is
/// taken as already flat.
pub fn classify(value: Value) -> Result<ResponseShape, GradingError> {
    let object = match &value {
        Value::Object(map) => map,
        _ => {
            return Err(GradingError::UnrecognizedShape(
                "response body is not a JSON object".to_string(),
            ))
        }
    };

    if !object.contains_key("evaluador") {
        return Ok(ResponseShape::Flat(value));
    }

    let raw_ocr_text = object
        .get("raw_ocr_text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let first = object
        .get("evaluador")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .ok_or_else(|| {
            GradingError::UnrecognizedShape(
                "'evaluador' is not a non-empty array".to_string(),
            )
        })?;

    let report = first.get("json").cloned().ok_or_else(|| {
        GradingError::UnrecognizedShape(
            "first 'evaluador' entry has no 'json' field".to_string(),
        )
    })?;

    Ok(ResponseShape::Nested {
        report,
        raw_ocr_text,
    })
}

/// Normalizes either response shape into the flat [`GradingReport`].
pub fn normalize(value: Value) -> Result<GradingReport, GradingError> {
    match classify(value)? {
        ResponseShape::Flat(report) => serde_json::from_value(report)
            .map_err(|err| GradingError::Deserialization(err.to_string())),
        ResponseShape::Nested {
            report,
            raw_ocr_text,
        } => {
            let mut report: GradingReport = serde_json::from_value(report)
                .map_err(|err| GradingError::Deserialization(err.to_string()))?;
            // The transcript only exists at the envelope level in the nested
            // shape; carry it into the flattened report.
            if report.raw_ocr_text.is_empty() {
                report.raw_ocr_text = raw_ocr_text;
            }
            Ok(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_responses_pass_through() {
        let body = json!({
            "correct_count": 5,
            "incorrect_count": 1,
            "percent_correct": 83.3,
            "answers": [
                {"question": 1, "studentValue": "A", "correctValue": "A", "isCorrect": true}
            ],
            "raw_ocr_text": "1. A"
        });

        let report = normalize(body).unwrap();
        assert_eq!(report.correct_count, 5);
        assert_eq!(report.answers.len(), 1);
        assert!(report.answers[0].is_correct);
        assert_eq!(report.raw_ocr_text, "1. A");
    }

    #[test]
    fn nested_responses_are_flattened_with_an_empty_transcript_default() {
        let body = json!({
            "evaluador": [
                {"json": {"correct_count": 4, "incorrect_count": 1, "percent_correct": 80}}
            ]
        });

        let report = normalize(body).unwrap();
        assert_eq!(report.correct_count, 4);
        assert_eq!(report.incorrect_count, 1);
        assert_eq!(report.percent_correct, 80.0);
        assert_eq!(report.raw_ocr_text, "");
    }

    #[test]
    fn nested_responses_inherit_the_top_level_transcript() {
        let body = json!({
            "raw_ocr_text": "1. B  2. C",
            "evaluador": [
                {"json": {"correct_count": 2, "incorrect_count": 0, "percent_correct": 100}}
            ]
        });

        let report = normalize(body).unwrap();
        assert_eq!(report.raw_ocr_text, "1. B  2. C");
    }

    #[test]
    fn malformed_envelopes_are_structure_errors() {
        let empty_list = json!({"evaluador": []});
        assert!(matches!(
            normalize(empty_list),
            Err(GradingError::UnrecognizedShape(_))
        ));

        let missing_json = json!({"evaluador": [{"result": {}}]});
        assert!(matches!(
            normalize(missing_json),
            Err(GradingError::UnrecognizedShape(_))
        ));

        let not_an_object = json!(["not", "a", "report"]);
        assert!(matches!(
            normalize(not_an_object),
            Err(GradingError::UnrecognizedShape(_))
        ));
    }
}
