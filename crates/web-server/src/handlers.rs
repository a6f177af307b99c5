use crate::{error::AppError, AppState};
use analytics::{ScoreSummary, StatisticsEngine};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{NaiveDate, Utc};
use core_types::{AuthSession, DateRange, ExamResultRecord, FilterCriteria};
use exporter::ExportFormat;
use grading_client::responses::GradingReport;
use grading_client::{AnswerKey, GradingClient, GradingSubmission};
use reporting::{build_report, ReportOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The filter parameters accepted by the results and export endpoints.
/// `exam_ids` is a comma-separated list; omitted means "all exams". Omitted
/// dates default to the loaded set's full span.
#[derive(Debug, Default, Deserialize)]
pub struct ResultsQuery {
    pub exam_ids: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// The three distinct outcomes of a results query. "No records loaded" and
/// "filters matched nothing" are different states and are reported as such.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResultsResponse {
    NoRecords,
    NoMatches,
    Matches {
        records: Vec<ExamResultRecord>,
        summary: ScoreSummary,
    },
}

/// # POST /api/session
/// Checks the submitted credentials against the configured table and opens
/// the operator session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthSession>, AppError> {
    if !state.settings.auth.verify(&body.username, &body.password) {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let session = AuthSession::logged_in(body.username.clone());
    *state.session.write().await = session.clone();
    tracing::info!(user = %body.username, "Session opened.");
    Ok(Json(session))
}

/// # DELETE /api/session
/// Clears the operator session.
pub async fn logout(State(state): State<Arc<AppState>>) -> Json<AuthSession> {
    let cleared = AuthSession::logged_out();
    *state.session.write().await = cleared.clone();
    tracing::info!("Session closed.");
    Json(cleared)
}

/// # GET /api/exams
/// The distinct exam identifiers available for filtering.
pub async fn get_exams(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, AppError> {
    ensure_authenticated(&state).await?;
    let exams = state.repo.fetch_exam_ids().await?;
    Ok(Json(exams))
}

/// # GET /api/results
/// Loads the result set, applies the filters and returns the matching
/// records together with their descriptive statistics.
pub async fn get_results(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<ResultsResponse>, AppError> {
    ensure_authenticated(&state).await?;

    let records = state.repo.fetch_all_results().await?;
    if records.is_empty() {
        return Ok(Json(ResultsResponse::NoRecords));
    }

    let criteria = build_criteria(&records, &query);
    let filtered = analytics::apply_filters(&records, &criteria)?;
    if filtered.is_empty() {
        return Ok(Json(ResultsResponse::NoMatches));
    }

    let summary = StatisticsEngine::new().compute(&filtered)?.rounded();
    Ok(Json(ResultsResponse::Matches {
        records: filtered,
        summary,
    }))
}

/// # GET /api/results/export/:format
/// Runs the full reporting pipeline for the given filters and returns the
/// requested artifact as a download.
pub async fn export_results(
    State(state): State<Arc<AppState>>,
    Path(format): Path<String>,
    Query(query): Query<ResultsQuery>,
) -> Result<Response, AppError> {
    ensure_authenticated(&state).await?;

    let format: ExportFormat = format.parse().map_err(AppError::NotFound)?;

    let records = state.repo.fetch_all_results().await?;
    if records.is_empty() {
        return Err(AppError::NotFound(
            "There are no graded exams to export".to_string(),
        ));
    }

    let criteria = build_criteria(&records, &query);
    let artifact = match build_report(&records, &criteria)? {
        ReportOutcome::NoMatches => {
            return Err(AppError::NotFound(
                "No results match the selected filters".to_string(),
            ))
        }
        ReportOutcome::Report(bundle) => bundle.exports.into_artifact(format),
    };

    let headers = [
        (header::CONTENT_TYPE, artifact.mime.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        ),
    ];
    Ok((headers, artifact.bytes).into_response())
}

#[derive(Debug, Deserialize)]
pub struct GradingRequestBody {
    pub student_id: String,
    pub exam_id: String,
    /// Plain base64 image bytes, no data-URI prefix.
    pub exam_image: String,
    /// JSON object literal mapping question numbers to expected answers.
    pub answer_key: String,
}

/// # POST /api/gradings
/// Validates the answer key and image, forwards the submission to the
/// grading service, and returns the normalized evaluation.
pub async fn submit_grading(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GradingRequestBody>,
) -> Result<Json<GradingReport>, AppError> {
    ensure_authenticated(&state).await?;

    // Both validations happen before the request is issued.
    let answer_key = AnswerKey::parse(&body.answer_key)?;
    let image = STANDARD
        .decode(body.exam_image.trim())
        .map_err(|err| AppError::Validation(format!("exam_image is not valid base64: {err}")))?;

    let submission = GradingSubmission {
        student_id: body.student_id,
        exam_id: body.exam_id,
        image,
        answer_key,
        timestamp: Utc::now(),
    };

    let report = state.grader.grade(&submission).await?;
    Ok(Json(report))
}

/// The is-authenticated gate every reporting and grading endpoint sits
/// behind. The session is an explicit value owned by the state, not ambient
/// process globals.
async fn ensure_authenticated(state: &AppState) -> Result<(), AppError> {
    let session = state.session.read().await;
    if session.authenticated {
        Ok(())
    } else {
        Err(AppError::Unauthorized("Login required".to_string()))
    }
}

/// Assembles the filter criteria from query parameters, defaulting the date
/// range to the loaded set's full span. Only called with a non-empty record
/// set, so the span is always defined.
fn build_criteria(records: &[ExamResultRecord], query: &ResultsQuery) -> FilterCriteria {
    let exam_ids = query.exam_ids.as_ref().map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<String>>()
    });

    let span = DateRange::spanning(records).expect("non-empty record set has a span");
    let date_range = DateRange::new(
        query.from.unwrap_or(span.start),
        query.to.unwrap_or(span.end),
    );

    FilterCriteria {
        exam_ids,
        date_range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(ts: &str, exam: &str) -> ExamResultRecord {
        ExamResultRecord {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S")
                .unwrap()
                .and_utc(),
            student_id: "s1".to_string(),
            exam_id: exam.to_string(),
            percent_correct: 75.0,
        }
    }

    #[test]
    fn criteria_default_to_all_exams_over_the_full_span() {
        let records = vec![
            record("2025-03-05 10:00:00", "E1"),
            record("2025-03-01 10:00:00", "E2"),
        ];

        let criteria = build_criteria(&records, &ResultsQuery::default());
        assert_eq!(criteria.exam_ids, None);
        assert_eq!(
            criteria.date_range,
            DateRange::new(
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
            )
        );
    }

    #[test]
    fn comma_separated_exam_ids_become_a_set() {
        let records = vec![record("2025-03-05 10:00:00", "E1")];
        let query = ResultsQuery {
            exam_ids: Some("E1, E2 ,E1".to_string()),
            from: None,
            to: None,
        };

        let criteria = build_criteria(&records, &query);
        let exam_ids = criteria.exam_ids.unwrap();
        assert_eq!(exam_ids.len(), 2);
        assert!(exam_ids.contains("E1") && exam_ids.contains("E2"));
    }

    #[test]
    fn an_empty_exam_ids_parameter_is_preserved_as_an_empty_selection() {
        // The filter engine rejects this downstream instead of silently
        // matching everything or nothing.
        let records = vec![record("2025-03-05 10:00:00", "E1")];
        let query = ResultsQuery {
            exam_ids: Some("".to_string()),
            from: None,
            to: None,
        };

        let criteria = build_criteria(&records, &query);
        assert_eq!(criteria.exam_ids, Some(BTreeSet::new()));
    }
}
